use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::PipelineError;

/// Abbreviations whose trailing period must not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "St.", "etc.", "i.e.", "e.g.",
];

/// Stand-in for a protected abbreviation period while splitting.
const POINT: &str = "<POINT>";

/// Inputs longer than this that still come back as one sentence get a looser split.
const LOOSE_SPLIT_MIN_CHARS: usize = 100;

static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Mr\.|Mrs\.|Ms\.|Dr\.|Prof\.|St\.|etc\.|i\.e\.|e\.g\.)").unwrap()
});
static STRICT_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());
static LOOSE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?:]\s+|\n\s*").unwrap());

/// A sentence splitter that may fail; `segment` falls through to cruder tiers when it does.
pub trait SentenceTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, PipelineError>;
}

/// UAX #29 sentence boundaries, re-joined across known abbreviations.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeTokenizer;

impl SentenceTokenizer for UnicodeTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::Segmentation("blank input".to_string()));
        }
        let mut sentences: Vec<String> = Vec::new();
        let mut pending = String::new();

        for piece in text.split_sentence_bounds() {
            pending.push_str(piece);
            let tail = pending.trim_end();
            if ABBREVIATIONS.iter().any(|a| ends_with_word(tail, a)) {
                continue;
            }
            let sentence = tail.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            pending.clear();
        }

        let rest = pending.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        Ok(sentences)
    }
}

/// True when `text` ends with `word` and `word` starts at a word boundary.
fn ends_with_word(text: &str, word: &str) -> bool {
    match text.strip_suffix(word) {
        Some(head) => head.chars().last().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Split text into sentences with the default tokenizer.
pub fn segment(text: &str) -> Vec<String> {
    segment_with(&UnicodeTokenizer, text)
}

/// Split text into sentences, degrading through four tiers:
/// the given tokenizer, a regex splitter, blank-line paragraphs, and finally
/// the whole text as one sentence. Never fails; blank input yields nothing.
pub fn segment_with(tokenizer: &dyn SentenceTokenizer, text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match tokenizer.tokenize(text) {
        Ok(sentences) if !sentences.is_empty() => return sentences,
        Ok(_) => debug!("tokenizer returned no sentences, using regex split"),
        Err(e) => warn!(error = %e, "sentence tokenizer failed, using regex split"),
    }

    let sentences = regex_split(text);
    if !sentences.is_empty() {
        return sentences;
    }

    let paragraphs = paragraph_split(text);
    if !paragraphs.is_empty() {
        warn!("regex split found no sentence breaks, using paragraphs");
        return paragraphs;
    }

    debug!("no sentence or paragraph breaks, keeping text whole");
    vec![trimmed.to_string()]
}

/// Split on whitespace following `.`, `!` or `?`, with abbreviation periods protected.
/// Falls back to also splitting after `:` and at newlines when a long text
/// would otherwise come back as a single sentence.
///
/// Returns nothing when no break is found, so the caller can move on.
pub fn regex_split(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let protected = PROTECTED.replace_all(&text, |caps: &regex::Captures| {
        caps[0].replace('.', POINT)
    });

    let mut pieces = split_after(&STRICT_BREAK, &protected);
    if pieces.len() <= 1 && protected.chars().count() > LOOSE_SPLIT_MIN_CHARS {
        pieces = split_after(&LOOSE_BREAK, &protected);
    }

    let sentences: Vec<String> = pieces
        .into_iter()
        .map(|s| s.replace(POINT, ".").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() < 2 {
        return Vec::new();
    }
    sentences
}

/// Cut `text` at every match of `pattern`, keeping a leading terminator with
/// the piece before the cut and discarding the whitespace.
fn split_after<'a>(pattern: &Regex, text: &'a str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        let keep = match m.as_str().chars().next() {
            Some(c) if matches!(c, '.' | '!' | '?' | ':') => c.len_utf8(),
            _ => 0,
        };
        pieces.push(&text[last..m.start() + keep]);
        last = m.end();
    }
    pieces.push(&text[last..]);
    pieces
}

/// Blank-line separated paragraphs; nothing when there is only one.
fn paragraph_split(text: &str) -> Vec<String> {
    let paragraphs: Vec<String> = text
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if paragraphs.len() < 2 {
        return Vec::new();
    }
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenTokenizer;

    impl SentenceTokenizer for BrokenTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<String>, PipelineError> {
            Err(PipelineError::Segmentation("model not loaded".into()))
        }
    }

    struct SilentTokenizer;

    impl SentenceTokenizer for SilentTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<String>, PipelineError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_segment_two_sentences() {
        let text = "The radical left pushed an extreme bill. Experts agree it always fails.";
        assert_eq!(
            segment(text),
            vec![
                "The radical left pushed an extreme bill.",
                "Experts agree it always fails."
            ]
        );
    }

    #[test]
    fn test_segment_keeps_abbreviations() {
        let text = "Dr. Smith met Mrs. Jones on Main St. today. They talked.";
        let sentences = segment(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Dr. Smith met Mrs. Jones on Main St. today.");
    }

    #[test]
    fn test_segment_blank_input() {
        assert!(segment("").is_empty());
        assert!(segment("   \n ").is_empty());
    }

    #[test]
    fn test_segment_never_invents_characters() {
        let text = "Wait! Is this real? Yes. It is.";
        let joined = segment(text).join(" ");
        assert_eq!(joined, text);
    }

    #[test]
    fn test_broken_tokenizer_falls_back_to_regex() {
        let text = "Prof. Lee disagreed. The vote, e.g. the second one, failed!";
        let sentences = segment_with(&BrokenTokenizer, text);
        assert_eq!(
            sentences,
            vec!["Prof. Lee disagreed.", "The vote, e.g. the second one, failed!"]
        );
    }

    #[test]
    fn test_regex_split_loose_retry_on_long_text() {
        let text = "Key findings from the report include the following items: \
                    costs rose sharply\nwages stayed flat\nand the deficit widened considerably";
        let sentences = regex_split(text);
        assert_eq!(
            sentences,
            vec![
                "Key findings from the report include the following items:",
                "costs rose sharply",
                "wages stayed flat",
                "and the deficit widened considerably",
            ]
        );
    }

    #[test]
    fn test_regex_split_without_break_finds_nothing() {
        assert!(regex_split("No terminator here: really").is_empty());
        assert!(regex_split("One sentence only.").is_empty());
    }

    #[test]
    fn test_falls_back_to_paragraphs() {
        let text = "Budget talks resume\n\nMayor to speak at noon";
        let sentences = segment_with(&BrokenTokenizer, text);
        assert_eq!(sentences, vec!["Budget talks resume", "Mayor to speak at noon"]);
    }

    #[test]
    fn test_silent_tokenizer_keeps_text_whole() {
        let sentences = segment_with(&SilentTokenizer, "just one fragment");
        assert_eq!(sentences, vec!["just one fragment"]);
    }

    #[test]
    fn test_unicode_tokenizer_rejects_blank_input() {
        assert!(matches!(
            UnicodeTokenizer.tokenize("  \n "),
            Err(PipelineError::Segmentation(_))
        ));
    }
}
