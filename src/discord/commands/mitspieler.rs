use tracing::{info, instrument};

use crate::discord::bot::Context;
use crate::error::AppError;

/// Show the known pro players in a streamer's current game
#[poise::command(slash_command)]
#[instrument(skip(ctx), fields(user_id = %ctx.author().id, channel))]
pub async fn mitspieler(
    ctx: Context<'_>,
    #[description = "Streamer or player name (defaults to this channel's name)"]
    name: Option<String>,
) -> Result<(), AppError> {
    ctx.defer().await?;

    let channel = channel_name(ctx).await?;
    tracing::Span::current().record("channel", channel.as_str());

    let name = name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| channel.clone());

    let reply = ctx
        .data()
        .live
        .lookup(&name, &ctx.author().name, &channel)
        .await?;

    ctx.say(reply.to_string()).await?;
    info!(name = %name, "🎮 Lookup answered");

    Ok(())
}

/// Name of the invoking channel. Direct messages fall back to the author.
async fn channel_name(ctx: Context<'_>) -> Result<String, AppError> {
    let channel = ctx.channel_id().to_channel(ctx.serenity_context()).await?;
    Ok(channel
        .guild()
        .map(|channel| channel.name)
        .unwrap_or_else(|| ctx.author().name.clone()))
}
