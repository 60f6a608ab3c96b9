/// Playback control commands: pause, resume, toggle, skip
use super::Bot;
use crate::error::{BotError, Result};
use jukebox_core::{OutgoingMessage, RequestSource};

const NOT_PLAYING: &str = "Not currently playing a track";
const NO_RESPONSE: &str = "The player did not respond, please try again";

pub async fn pause(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let accepted = {
        let session = session.lock().await;
        if session.is_empty() {
            return Err(BotError::absent(NOT_PLAYING));
        }
        session.pause().await?
    };

    let reply = if accepted { "Paused!" } else { NO_RESPONSE };
    request.reply(reply.into()).await?;
    Ok(())
}

pub async fn resume(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let accepted = {
        let session = session.lock().await;
        if session.is_empty() {
            return Err(BotError::absent(NOT_PLAYING));
        }
        session.resume().await?
    };

    let reply = if accepted { "Resumed!" } else { NO_RESPONSE };
    request.reply(reply.into()).await?;
    Ok(())
}

pub async fn toggle(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let (was_playing, accepted) = {
        let session = session.lock().await;
        if session.is_empty() {
            return Err(BotError::absent(NOT_PLAYING));
        }
        let was_playing = session.engine_state().is_active();
        (was_playing, session.togglepause().await?)
    };

    let reply = match (accepted, was_playing) {
        (false, _) => NO_RESPONSE,
        (true, true) => "Paused!",
        (true, false) => "Resumed!",
    };
    request.reply(reply.into()).await?;
    Ok(())
}

pub async fn skip(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, true).await?;
    let next = {
        let mut session = session.lock().await;
        if session.is_empty() {
            return Err(BotError::absent("There are no tracks to skip"));
        }
        session.skip().await
    };

    let reply = match next {
        Some(entry) => OutgoingMessage::with_track(
            format!("Skipped, now playing **{}**", entry.track.title),
            &entry.track,
        ),
        None => OutgoingMessage::text("Skipped, no more tracks to play.."),
    };
    request.reply(reply).await?;
    Ok(())
}
