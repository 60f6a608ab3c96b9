/// Read-only commands: list, now, status, help
use super::{Bot, COMMANDS};
use crate::error::{BotError, Result};
use crate::format::format_duration;
use jukebox_core::{OutgoingMessage, RequestSource};
use jukebox_playback::QueueEntry;
use std::time::Duration;

/// Show one page of the playlist, the first one by default
pub async fn list(bot: &Bot, request: &dyn RequestSource, page: Option<usize>) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let content = {
        let session = session.lock().await;
        render_list(session.entries(), bot.max_per_page, page.unwrap_or(1))?
    };

    request.reply(content.into()).await?;
    Ok(())
}

/// Page `page` (1-based) of the playlist as a code block
///
/// The head always sits on page 1. Pages past the end are rejected.
pub fn render_list(entries: &[QueueEntry], max_per_page: usize, page: usize) -> Result<String> {
    if entries.is_empty() {
        return Ok("```\n(no tracks yet)```".to_string());
    }

    let pages = entries.len().div_ceil(max_per_page);
    if page == 0 || page > pages {
        return Err(BotError::validation(format!(
            "Page {} does not exist, the playlist has {} page(s)",
            page, pages
        )));
    }

    let mut lines: Vec<String> = entries
        .iter()
        .skip((page - 1) * max_per_page)
        .take(max_per_page)
        .map(render_entry)
        .collect();
    if pages > 1 {
        lines.push(format!("(page {}/{}, {} tracks)", page, pages, entries.len()));
    }

    Ok(format!("```asciidoc\n{}```", lines.join("\n")))
}

fn render_entry(entry: &QueueEntry) -> String {
    let track = &entry.track;
    format!(
        "{}# {} - {} from {}",
        entry.index,
        format_duration(track.duration.unwrap_or(Duration::ZERO), true),
        track.title,
        track.requester_name().unwrap_or("unknown"),
    )
}

pub async fn now(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let playing = session.lock().await.playing().cloned();
    let entry = playing.ok_or_else(|| BotError::absent("There are no tracks currently playing"))?;

    request
        .reply(OutgoingMessage::with_track(
            format!("Currently playing **{}**", entry.track.title),
            &entry.track,
        ))
        .await?;
    Ok(())
}

pub async fn status(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let session = bot.registry.resolve_with_channel(request, false).await?;
    let (count, total) = {
        let session = session.lock().await;
        (session.len(), session.total_duration())
    };

    request
        .reply(
            format!(
                "Total tracks: {}\nPlaylist time: {}",
                count,
                format_duration(total, true)
            )
            .into(),
        )
        .await?;
    Ok(())
}

pub async fn help(bot: &Bot, request: &dyn RequestSource) -> Result<()> {
    let lines: Vec<String> = COMMANDS
        .iter()
        .map(|(usage, description)| format!("{}{} - {}", bot.prefix, usage, description))
        .collect();

    request.reply(lines.join("\n").into()).await?;
    Ok(())
}
