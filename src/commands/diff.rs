use super::{render, send_chunked};
use crate::diff as text_diff;
use crate::state::Context;

/// Compare two versions of a text sentence by sentence
#[poise::command(slash_command, guild_only)]
pub async fn diff(
    ctx: Context<'_>,
    #[description = "Original text"] original: String,
    #[description = "Rewritten text"] rewritten: String,
) -> Result<(), anyhow::Error> {
    let comparison = text_diff::compare(&original, &rewritten);
    send_chunked(&ctx, &render::comparison(&comparison)).await
}
