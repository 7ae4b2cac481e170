use std::collections::BTreeMap;

use tracing::info;

use super::{autocomplete_topic, render, send_chunked};
use crate::analytics::{self, ArticleContext};
use crate::state::Context;
use crate::store::types::SavedAnalysis;

/// Compare how saved articles on one topic cover the story
#[poise::command(slash_command, guild_only)]
pub async fn coverage(
    ctx: Context<'_>,
    #[description = "Topic used when saving analyses"]
    #[autocomplete = "autocomplete_topic"]
    topic: String,
) -> Result<(), anyhow::Error> {
    let saved = ctx.data().store.analyses(&topic).await?;
    if saved.len() < 2 {
        ctx.say(format!(
            "Topic **{}** has {} saved analysis(es). Save at least two with `/bias analyze topic:{}`.",
            topic,
            saved.len(),
            topic
        ))
        .await?;
        return Ok(());
    }

    let sentiments: Vec<f64> = saved.iter().map(|s| s.metrics.sentiment_score).collect();
    let distributions: Vec<BTreeMap<String, f64>> = saved
        .iter()
        .map(|s| s.analysis.categories.to_map())
        .collect();
    let contexts: Vec<ArticleContext> = saved.iter().map(article_context).collect();

    let variance = analytics::sentiment_variance(&sentiments);
    let similarity = analytics::bias_similarity(&distributions);
    let overlap = analytics::context_overlap(&contexts);

    info!(
        topic,
        articles = saved.len(),
        variance,
        similarity,
        "Coverage computed"
    );

    ctx.say(render::coverage(&topic, saved.len(), variance, similarity, &overlap))
        .await?;
    Ok(())
}

fn article_context(saved: &SavedAnalysis) -> ArticleContext {
    ArticleContext {
        related_events: saved
            .analysis
            .instances
            .iter()
            .map(|i| i.excerpt.clone())
            .collect(),
        missing_context: saved
            .analysis
            .missing_context
            .iter()
            .map(|m| m.statement.clone())
            .collect(),
    }
}

/// List saved analyses
#[poise::command(slash_command, guild_only)]
pub async fn history(
    ctx: Context<'_>,
    #[description = "Max analyses to show"] limit: Option<u32>,
) -> Result<(), anyhow::Error> {
    let limit = limit.unwrap_or(20) as usize;
    let saved = ctx.data().store.recent(limit).await?;

    if saved.is_empty() {
        ctx.say("No analyses saved yet. Use `/bias analyze` with a `topic` to save one.")
            .await?;
        return Ok(());
    }

    // Group by topic
    let mut by_topic: BTreeMap<&str, Vec<&SavedAnalysis>> = BTreeMap::new();
    for s in &saved {
        by_topic.entry(s.topic.as_str()).or_default().push(s);
    }

    let mut output = String::from("**Saved Analyses**\n\n");
    for (topic, entries) in &by_topic {
        output.push_str(&format!("**Topic: {}**\n", topic));
        for s in entries {
            let when = chrono::DateTime::from_timestamp(s.saved_at, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            output.push_str(&format!(
                "  - {} ({:.0}/100) `{}` {}\n",
                s.headline,
                s.analysis.bias_score,
                &s.id[..12],
                when
            ));
        }
        output.push('\n');
    }

    send_chunked(&ctx, &output).await
}
