use crate::discord::bot::Context;
use crate::error::AppError;

const USAGE: &str = "/mitspieler [Spieler/Streamer]";

/// List the available commands
#[poise::command(slash_command, rename = "commands", ephemeral)]
pub async fn commands(ctx: Context<'_>) -> Result<(), AppError> {
    ctx.say(USAGE).await?;
    Ok(())
}
