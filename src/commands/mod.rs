mod analyze;
mod config;
mod coverage;
mod diff;
mod render;
mod source;

use crate::pipeline::Document;
use crate::state::Context;
use crate::store::fetch;

/// Bias Buster - news bias analysis and balanced rewrites
#[poise::command(
    slash_command,
    subcommands(
        "analyze::analyze",
        "analyze::rewrite",
        "diff::diff",
        "coverage::coverage",
        "coverage::history",
        "source::source",
        "config::config"
    )
)]
pub async fn bias(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send a message in Discord-safe chunks.
/// Uses ctx.say() for all chunks: poise routes follow-ups through the
/// interaction webhook, which doesn't require Send Messages channel permission.
async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in render::split_message(text, render::MAX_MESSAGE_LEN) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Build a document from pasted text or, failing that, a fetched URL.
/// Returns None (after telling the user) when neither was given.
async fn load_document(
    ctx: &Context<'_>,
    text: Option<String>,
    url: Option<String>,
) -> Result<Option<Document>, anyhow::Error> {
    match (text, url) {
        (Some(text), url) => {
            let doc = Document::new(text);
            Ok(Some(match url {
                Some(url) => doc.with_url(url),
                None => doc,
            }))
        }
        (None, Some(url)) => {
            let article = fetch::fetch_article(&url).await?;
            Ok(Some(Document::new(article.text).with_url(article.url)))
        }
        (None, None) => {
            ctx.say("Provide either `text` or `url`.").await?;
            Ok(None)
        }
    }
}

/// Autocomplete for topic names from saved analyses.
async fn autocomplete_topic(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let topics = ctx.data().store.topics().await.unwrap_or_default();

    topics
        .into_iter()
        .filter(|t| t.to_lowercase().contains(&partial.to_lowercase()))
        .take(25)
        .collect()
}
