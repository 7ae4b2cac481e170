use crate::state::Context;
use crate::store::domain_of;

/// Look up the credibility score of a news source
#[poise::command(slash_command, guild_only)]
pub async fn source(
    ctx: Context<'_>,
    #[description = "Domain or article URL"] domain: String,
) -> Result<(), anyhow::Error> {
    let domain = domain_of(&domain).unwrap_or(domain);
    let record = ctx.data().store.credibility(&domain).await?;

    ctx.say(format!(
        "**{}** credibility: {:.2} (0 = unreliable, 1 = highly reliable)",
        record.domain, record.score
    ))
    .await?;
    Ok(())
}
