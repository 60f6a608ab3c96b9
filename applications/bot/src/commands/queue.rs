/// Queue mutation commands: push, remove, clear, shuffle
use super::Bot;
use crate::error::{BotError, Result};
use jukebox_core::{OutgoingMessage, RequestSource, TrackMetadata};

/// Search a track and append it, joining the user's channel if needed
pub async fn push(bot: &Bot, request: &dyn RequestSource, query: &str) -> Result<()> {
    let metadata = TrackMetadata::requested_by(request.requester().clone());
    let track = bot
        .resolver
        .search(query, metadata)
        .await?
        .ok_or_else(|| BotError::absent("No results found"))?;

    let session = bot.registry.resolve_with_channel(request, true).await?;
    session.lock().await.push(track.clone(), true);

    request
        .reply(OutgoingMessage::with_track(
            format!("Added **{}** to the playlist!", track.title),
            &track,
        ))
        .await?;
    Ok(())
}

pub async fn remove(bot: &Bot, request: &dyn RequestSource, index: u64) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    session.lock().await.remove(index)?;

    request
        .reply(format!("Removed track #{} from the playlist!", index).into())
        .await?;
    Ok(())
}

pub async fn clear(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let cleared = session.lock().await.clear();

    request
        .reply(format!("Cleared **{} tracks** from the playlist!", cleared).into())
        .await?;
    Ok(())
}

pub async fn shuffle(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    {
        let mut session = session.lock().await;
        if session.len() <= 1 {
            return Err(BotError::absent("There are no tracks to shuffle"));
        }
        session.shuffle();
    }

    request.reply("Shuffled!".into()).await?;
    Ok(())
}
