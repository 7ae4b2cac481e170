use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(advertisement|subscribe|sign up)").unwrap());

/// Paragraphs at or under this many chars are treated as navigation/caption noise.
const MIN_PARAGRAPH_CHARS: usize = 50;

/// Collapse whitespace runs, drop anything that looks like a markup tag, trim.
///
/// Tags are matched by pattern rather than parsed, so unbalanced or broken
/// markup is stripped as far as the pattern reaches and the rest is left alone.
pub fn normalize(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw, " ");
    let stripped = MARKUP_TAG.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Keep only paragraphs that look like article body.
///
/// Paragraphs are blank-line separated; short ones and ones mentioning
/// ads or newsletter prompts are dropped.
pub fn extract_main_content(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS && !BOILERPLATE.is_match(p))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_tags() {
        let raw = "  <p>The  council\n\tvoted</p>\r\n<b>today</b>.  ";
        assert_eq!(normalize(raw), "The council voted today.");
    }

    #[test]
    fn test_normalize_tolerates_broken_markup() {
        assert_eq!(normalize("a <b>bold< claim"), "a bold< claim");
        assert_eq!(normalize("x < y and y > z"), "x  z");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_extract_main_content_filters_noise() {
        let body = "The city council approved the new transit budget after a long debate on Tuesday.";
        let text = format!(
            "Home | News\n\n{body}\n\nADVERTISEMENT: buy our premium product line today at a discount\n\n\
             Sign up for our newsletter to get the latest stories delivered to you"
        );
        assert_eq!(extract_main_content(&text), body);
    }

    #[test]
    fn test_extract_main_content_rejoins_with_blank_lines() {
        let a = "First paragraph with more than fifty characters of article body text.";
        let b = "Second paragraph also comfortably longer than the fifty character cutoff.";
        let text = format!("{a}\n\n\n\n{b}");
        assert_eq!(extract_main_content(&text), format!("{a}\n\n{b}"));
    }

    #[test]
    fn test_extract_main_content_empty() {
        assert_eq!(extract_main_content(""), "");
    }
}
