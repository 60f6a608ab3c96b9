//! Session registry integration tests

mod common;

use common::{settle, track, EngineCall, FakeRequest, Harness};
use jukebox_core::{ChannelId, ErrorKind, TenantId};
use jukebox_playback::{EngineState, PlaybackEngine, PlaybackError};
use std::sync::Arc;

// ===== Lifecycle Tests =====

#[tokio::test(start_paused = true)]
async fn test_create_twice_fails() {
    let h = Harness::new();
    let registry = h.registry();

    registry.create(TenantId::new("g1")).await.unwrap();
    let err = registry.create(TenantId::new("g1")).await.unwrap_err();

    assert!(matches!(err, PlaybackError::SessionExists(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(registry.len().await, 1);
    assert_eq!(h.engines.created(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delete_missing_fails() {
    let h = Harness::new();
    let registry = h.registry();

    let err = registry.delete(&TenantId::new("g1")).await.unwrap_err();

    assert!(matches!(err, PlaybackError::SessionNotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn test_resolve_creates_once() {
    let h = Harness::new();
    let registry = h.registry();
    let tenant = TenantId::new("g1");

    assert!(registry.get(&tenant).await.is_none());
    let first = registry.resolve(&tenant).await;
    let second = registry.resolve(&tenant).await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(h.engines.created(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sessions_are_isolated_per_tenant() {
    let h = Harness::new();
    let registry = h.registry();

    let g1 = registry.resolve(&TenantId::new("g1")).await;
    let g2 = registry.resolve(&TenantId::new("g2")).await;

    g1.lock().await.push(track("a", 60), true);
    g1.lock().await.push(track("b", 60), true);
    let entry = g2.lock().await.push(track("c", 60), true);

    assert_eq!(entry.index, 1);
    assert_eq!(g1.lock().await.len(), 2);
    assert_eq!(
        registry.tenants().await,
        vec![TenantId::new("g1"), TenantId::new("g2")]
    );
}

#[tokio::test(start_paused = true)]
async fn test_delete_tears_down_playback() {
    let h = Harness::new();
    let registry = h.registry();
    let tenant = TenantId::new("g1");
    let request = FakeRequest::new("g1", Some("voice-1"), None);

    let session = registry.resolve_with_channel(&request, true).await.unwrap();
    {
        let mut guard = session.lock().await;
        guard.push(track("a", 60), true);
        guard.push(track("b", 60), true);
    }
    let engine = h.engines.engine(&tenant);

    registry.delete(&tenant).await.unwrap();
    settle().await;

    assert!(registry.is_empty().await);
    assert!(h.transport.last().is_destroyed());
    assert_eq!(engine.count(&EngineCall::Stop), 1);
    assert_eq!(engine.state(), EngineState::Idle);

    // the stop's Playing -> Idle must not revive the detached session
    let guard = session.lock().await;
    assert!(guard.is_closed());
    assert!(guard.is_empty());
    assert_eq!(engine.plays(), vec!["a"]);
}

// ===== Voice Membership Tests =====

#[tokio::test(start_paused = true)]
async fn test_resolve_with_channel_requires_voice() {
    let h = Harness::new();
    let registry = h.registry();
    let request = FakeRequest::new("g1", None, None);

    let err = registry
        .resolve_with_channel(&request, true)
        .await
        .unwrap_err();

    assert!(matches!(err, PlaybackError::NotInVoiceChannel));
    assert_eq!(err.kind(), ErrorKind::MembershipConflict);
    assert!(h.transport.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_resolve_with_channel_rejects_other_channel() {
    let h = Harness::new();
    let registry = h.registry();
    let request = FakeRequest::new("g1", Some("voice-1"), Some("voice-2"));

    let err = registry
        .resolve_with_channel(&request, true)
        .await
        .unwrap_err();

    assert!(matches!(err, PlaybackError::ChannelMismatch { .. }));
    assert_eq!(err.to_string(), "You are not in the same channel as the bot");
    assert!(h.transport.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_resolve_with_channel_auto_connects() {
    let h = Harness::new();
    let registry = h.registry();
    let request = FakeRequest::new("g1", Some("voice-1"), None);

    let session = registry.resolve_with_channel(&request, true).await.unwrap();

    let guard = session.lock().await;
    assert!(guard.is_connected());
    assert_eq!(guard.connected_channel(), Some(ChannelId::new("voice-1")));
    assert_eq!(h.transport.opened().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_resolve_with_channel_without_auto_connect() {
    let h = Harness::new();
    let registry = h.registry();
    let request = FakeRequest::new("g1", Some("voice-1"), None);

    let session = registry
        .resolve_with_channel(&request, false)
        .await
        .unwrap();

    assert!(!session.lock().await.is_connected());
    assert!(h.transport.opened().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_resolve_with_channel_reuses_connection() {
    let h = Harness::new();
    let registry = h.registry();

    let first = FakeRequest::new("g1", Some("voice-1"), None);
    registry.resolve_with_channel(&first, true).await.unwrap();

    let again = FakeRequest::new("g1", Some("voice-1"), Some("voice-1"));
    registry.resolve_with_channel(&again, true).await.unwrap();

    assert_eq!(h.transport.opened().len(), 1);
}
