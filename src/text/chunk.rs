use serde::{Deserialize, Serialize};
use tracing::warn;

use super::segment::{segment_with, SentenceTokenizer, UnicodeTokenizer};

/// Default section bound, in chars.
pub const DEFAULT_MAX_SECTION_LEN: usize = 1000;

/// A contiguous run of sentences sent to a collaborator as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Position in the document, starting at 0.
    pub index: usize,
    pub text: String,
    /// Zero when the section was not produced from segmented sentences.
    pub sentence_count: usize,
}

impl Section {
    fn from_sentences(index: usize, sentences: &[String]) -> Self {
        Self {
            index,
            text: sentences.join(" "),
            sentence_count: sentences.len(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Greedily pack sentences into sections of at most `max_length` chars.
///
/// A section is closed when the next sentence would push the running count
/// past the bound and the section already holds a sentence. The running count
/// includes the joining spaces, so a closed section's text never exceeds the
/// bound. A single sentence longer than the bound gets a section to itself and
/// is never split.
pub fn chunk(sentences: &[String], max_length: usize) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0usize;

    for sentence in sentences {
        let len = sentence.chars().count();
        if !current.is_empty() && current_len + 1 + len > max_length {
            sections.push(Section::from_sentences(sections.len(), &current));
            current.clear();
            current_len = 0;
        }
        if !current.is_empty() {
            current_len += 1;
        }
        current_len += len;
        current.push(sentence.clone());
    }

    if !current.is_empty() {
        sections.push(Section::from_sentences(sections.len(), &current));
    }
    sections
}

/// Segment `text` and chunk the sentences.
pub fn split_into_sections(text: &str, max_length: usize) -> Vec<Section> {
    split_into_sections_with(&UnicodeTokenizer, text, max_length)
}

pub fn split_into_sections_with(
    tokenizer: &dyn SentenceTokenizer,
    text: &str,
    max_length: usize,
) -> Vec<Section> {
    let sentences = segment_with(tokenizer, text);
    let sections = chunk(&sentences, max_length);
    if sections.is_empty() && !text.is_empty() {
        warn!(
            len = text.len(),
            "no sentences found, slicing by character count"
        );
        return slice_by_chars(text, max_length);
    }
    sections
}

/// Fixed-width slicing at `max_length` char boundaries.
pub fn slice_by_chars(text: &str, max_length: usize) -> Vec<Section> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_length.max(1))
        .enumerate()
        .map(|(index, window)| Section {
            index,
            text: window.iter().collect(),
            sentence_count: 0,
        })
        .collect()
}

/// Sections used for both analysis and rewriting.
///
/// Content at or under `threshold` chars goes out as one section; longer
/// content is split. Analyze and rewrite must both go through here so the
/// same content always produces the same sections.
pub fn plan_sections(
    tokenizer: &dyn SentenceTokenizer,
    content: &str,
    threshold: usize,
    max_length: usize,
) -> Vec<Section> {
    if content.chars().count() > threshold {
        split_into_sections_with(tokenizer, content, max_length)
    } else {
        vec![Section {
            index: 0,
            text: content.to_string(),
            sentence_count: 0,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn words(items: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut all: Vec<String> = items
            .into_iter()
            .flat_map(|s| s.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        all.sort();
        all
    }

    #[test]
    fn test_chunk_short_article_is_one_section() {
        let text = "The radical left pushed an extreme bill. Experts agree it always fails.";
        let sections = split_into_sections(text, DEFAULT_MAX_SECTION_LEN);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, text);
        assert_eq!(sections[0].sentence_count, 2);
    }

    #[test]
    fn test_chunk_respects_bound() {
        let sentences = owned(&["aaaa.", "bbbb.", "cccc.", "dddd.", "eeee."]);
        let sections = chunk(&sentences, 12);
        assert_eq!(
            sections.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
            vec!["aaaa. bbbb.", "cccc. dddd.", "eeee."]
        );
        assert!(sections.iter().all(|s| s.sentence_count <= 2));
        assert_eq!(
            sections.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_chunk_oversized_sentence_stands_alone() {
        let long = "x".repeat(50);
        let sentences = vec!["short one.".to_string(), long.clone(), "tail.".to_string()];
        let sections = chunk(&sentences, 20);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[1].text, long);
        assert_eq!(sections[1].sentence_count, 1);
        for s in &sections {
            assert!(s.char_len() <= 20 || s.sentence_count == 1);
        }
    }

    #[test]
    fn test_chunk_never_drops_words() {
        let sentences = owned(&[
            "One two three.",
            "Four five six seven eight.",
            "Nine.",
            "Ten eleven twelve thirteen fourteen fifteen.",
        ]);
        let sections = chunk(&sentences, 25);
        assert_eq!(
            words(sections.into_iter().map(|s| s.text)),
            words(sentences)
        );
    }

    #[test]
    fn test_chunk_empty() {
        assert!(chunk(&[], 100).is_empty());
        assert!(split_into_sections("", 100).is_empty());
    }

    #[test]
    fn test_slice_by_chars() {
        let sections = slice_by_chars("abcdefghij", 4);
        assert_eq!(
            sections.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_plan_sections_threshold() {
        let short = "A short piece of text. Only two sentences.";
        let planned = plan_sections(&UnicodeTokenizer, short, 2000, 10);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].text, short);

        let long = "This sentence is exactly forty-one chars. ".repeat(60);
        let planned = plan_sections(&UnicodeTokenizer, long.trim(), 2000, 1000);
        assert!(planned.len() > 1);
        assert_eq!(
            planned.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" "),
            long.trim()
        );
    }
}
