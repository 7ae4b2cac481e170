use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bias::{MissingContextItem, SectionVerdict};

/// Pull the JSON payload out of a model reply.
///
/// Prefers a ```json (or bare ```) fenced block; otherwise takes the span from
/// the first `{` or `[` to the last matching closer.
pub fn extract_json(input: &str) -> Option<&str> {
    if let Some(block) = fenced_block(input) {
        return Some(block);
    }

    let start = input.find(['{', '['])?;
    let closer = if input[start..].starts_with('{') { '}' } else { ']' };
    let end = input.rfind(closer)?;
    if end < start {
        return None;
    }
    Some(input[start..=end].trim())
}

fn fenced_block(input: &str) -> Option<&str> {
    let idx = input.find("```")?;
    let after_tag = &input[idx + 3..];
    // Skip the rest of the opening fence line (language tag)
    let body_start = after_tag.find('\n').map(|i| i + 1)?;
    let body = &after_tag[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    let block = body[..end].trim();
    if block.is_empty() {
        None
    } else {
        Some(block)
    }
}

pub fn parse_verdict(reply: &str) -> Result<SectionVerdict> {
    let json = extract_json(reply).context("no JSON object in classifier reply")?;
    serde_json::from_str(json).context("classifier reply is not a section verdict")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContextReply {
    Wrapped { missing_context: Vec<MissingContextItem> },
    Bare(Vec<MissingContextItem>),
}

/// Accepts either `{"missing_context": [...]}` or a bare list.
pub fn parse_missing_context(reply: &str) -> Result<Vec<MissingContextItem>> {
    let json = extract_json(reply).context("no JSON in context reply")?;
    let parsed: ContextReply =
        serde_json::from_str(json).context("context reply has unexpected shape")?;
    Ok(match parsed {
        ContextReply::Wrapped { missing_context } => missing_context,
        ContextReply::Bare(items) => items,
    })
}

/// Strip fences and wrapping quotes from a rewrite reply.
pub fn clean_rewrite(reply: &str) -> Option<String> {
    let body = fenced_block(reply).unwrap_or(reply).trim();
    let unquoted = if body.len() >= 2 && body.starts_with('"') && body.ends_with('"') {
        &body[1..body.len() - 1]
    } else {
        body
    };
    let unquoted = unquoted.trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::BiasCategory;

    #[test]
    fn test_extract_fenced_json() {
        let reply = "Here you go:\n```json\n{\"bias_score\": 3}\n```\nThanks";
        assert_eq!(extract_json(reply), Some("{\"bias_score\": 3}"));
    }

    #[test]
    fn test_extract_bare_json() {
        let reply = "Sure. {\"a\": {\"b\": 1}} done";
        assert_eq!(extract_json(reply), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json("[1, 2]"), Some("[1, 2]"));
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn test_parse_verdict() {
        let reply = r#"{"bias_score": 6.5, "bias_instances": [
            {"excerpt": "radical left", "category": "political", "severity": 7,
             "balanced_alternative": "progressive lawmakers"},
            {"excerpt": "always fails", "category": "hyperbole", "severity": 5,
             "balanced_alternative": "has failed before", "missing_context": "Past votes"}
        ]}"#;
        let verdict = parse_verdict(reply).unwrap();
        assert_eq!(verdict.bias_instances.len(), 2);
        assert_eq!(verdict.bias_instances[0].category, BiasCategory::Political);
        assert_eq!(
            verdict.bias_instances[1].category,
            BiasCategory::Other("hyperbole".into())
        );
        assert_eq!(
            verdict.bias_instances[1].missing_context.as_deref(),
            Some("Past votes")
        );
    }

    #[test]
    fn test_parse_verdict_rejects_prose() {
        assert!(parse_verdict("I could not find any bias.").is_err());
    }

    #[test]
    fn test_parse_missing_context_both_shapes() {
        let wrapped = r#"{"missing_context": [{"statement": "s", "context": "c", "sources": ["CBO"], "importance": 8}]}"#;
        let bare = r#"[{"statement": "s", "context": "c", "importance": 2}]"#;
        assert_eq!(parse_missing_context(wrapped).unwrap()[0].sources, vec!["CBO"]);
        assert!(parse_missing_context(bare).unwrap()[0].sources.is_empty());
    }

    #[test]
    fn test_clean_rewrite() {
        assert_eq!(
            clean_rewrite("```\nThe bill passed.\n```").as_deref(),
            Some("The bill passed.")
        );
        assert_eq!(clean_rewrite("\"Quoted.\"").as_deref(), Some("Quoted."));
        assert_eq!(clean_rewrite("   "), None);
    }
}
