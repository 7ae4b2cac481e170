use tracing::{info, warn};

use super::{autocomplete_topic, load_document, render, send_chunked};
use crate::sentiment;
use crate::state::Context;
use crate::store::{domain_of, validate_topic};

/// Analyze an article for bias
#[poise::command(slash_command, guild_only)]
pub async fn analyze(
    ctx: Context<'_>,
    #[description = "Article text"] text: Option<String>,
    #[description = "Article URL (fetched when no text is given)"] url: Option<String>,
    #[description = "Save under this topic for /bias coverage"]
    #[autocomplete = "autocomplete_topic"]
    topic: Option<String>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let topic = match topic.as_deref().map(validate_topic).transpose() {
        Ok(topic) => topic.map(str::to_string),
        Err(e) => {
            ctx.say(format!("Invalid topic: {}", e)).await?;
            return Ok(());
        }
    };
    let Some(document) = load_document(&ctx, text, url).await? else {
        return Ok(());
    };
    let data = ctx.data();
    let config = data.pipeline_config().await;

    info!(
        user = ctx.author().name,
        source_url = document.source_url.as_deref(),
        topic = topic.as_deref(),
        "Analysis requested"
    );

    let content = match data.pipeline.prepare(&document) {
        Ok(content) => content,
        Err(e) if e.is_user_facing() => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let analysis = data.pipeline.analyze(&document, &config).await?;
    let metrics = sentiment::analyze_text(&content);

    let credibility = match document.source_url.as_deref().and_then(domain_of) {
        Some(domain) => match data.store.credibility(&domain).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(domain, "Credibility lookup failed: {:#}", e);
                None
            }
        },
        None => None,
    };

    let mut reply = render::analysis(&analysis, &metrics, credibility.as_ref());
    if let Some(topic) = topic.as_deref() {
        let id = data
            .store
            .save_analysis(topic, &content, &analysis, metrics)
            .await?;
        reply.push_str(&format!("\nSaved under topic **{}** as `{}`", topic, &id[..12]));
    }

    send_chunked(&ctx, &reply).await
}

/// Rewrite an article in a more balanced way and show what changed
#[poise::command(slash_command, guild_only)]
pub async fn rewrite(
    ctx: Context<'_>,
    #[description = "Article text"] text: Option<String>,
    #[description = "Article URL (fetched when no text is given)"] url: Option<String>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let Some(document) = load_document(&ctx, text, url).await? else {
        return Ok(());
    };
    let config = ctx.data().pipeline_config().await;

    info!(user = ctx.author().name, "Rewrite requested");

    let result = match ctx.data().pipeline.analyze_and_rewrite(&document, &config).await {
        Ok(result) => result,
        Err(e) if e.is_user_facing() => {
            ctx.say(e.to_string()).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        bias_score = result.analysis.bias_score,
        added = result.comparison.changes.added,
        removed = result.comparison.changes.removed,
        "Rewrite complete"
    );

    let reply = format!(
        "**Bias score:** {:.0}/100 ({})\n\n**Balanced version:**\n{}\n\n{}",
        result.analysis.bias_score,
        result.analysis.level().label(),
        result.rewritten,
        render::comparison(&result.comparison)
    );
    send_chunked(&ctx, &reply).await
}
