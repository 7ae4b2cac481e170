use anyhow::{Context, Result};
use tracing::info;

/// Column width for rendered HTML.
const RENDER_WIDTH: usize = 120;

/// Article text fetched from the web.
#[derive(Debug, Clone)]
pub struct FetchedArticle {
    pub url: String,
    pub text: String,
}

/// Fetch a page and return its text, converting HTML when the server says it is HTML.
pub async fn fetch_article(url: &str) -> Result<FetchedArticle> {
    let parsed = url::Url::parse(url).context("Invalid URL")?;
    anyhow::ensure!(
        matches!(parsed.scheme(), "http" | "https"),
        "Only http(s) URLs can be fetched"
    );

    let resp = reqwest::get(parsed.as_str())
        .await
        .context("Failed to fetch URL")?
        .error_for_status()
        .context("Article request failed")?;

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = resp.bytes().await.context("Failed to read response body")?;
    let text = body_to_text(&content_type, &body);

    info!(url, size = text.len(), "article fetched");
    Ok(FetchedArticle {
        url: url.to_string(),
        text,
    })
}

fn body_to_text(content_type: &str, body: &[u8]) -> String {
    if content_type.contains("html") {
        html2text::from_read(body, RENDER_WIDTH)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).to_string())
    } else {
        String::from_utf8_lossy(body).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(body_to_text("text/plain", b"Hello there."), "Hello there.");
    }

    #[test]
    fn test_html_is_rendered() {
        let html = b"<html><body><p>Council approves the levy.</p></body></html>";
        let text = body_to_text("text/html; charset=utf-8", html);
        assert!(text.contains("Council approves the levy."));
        assert!(!text.contains("<p>"));
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        assert!(fetch_article("ftp://example.com/a").await.is_err());
        assert!(fetch_article("not a url").await.is_err());
    }
}
