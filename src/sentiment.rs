//! Lexicon-based tone metrics: how positive/negative and how opinionated a text reads.

use serde::{Deserialize, Serialize};

use crate::text::{self, DEFAULT_MAX_SECTION_LEN};

/// (word, polarity -1..1, subjectivity 0..1)
const LEXICON: &[(&str, f64, f64)] = &[
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("wonderful", 1.0, 1.0),
    ("delighted", 0.7, 0.8),
    ("happy", 0.8, 1.0),
    ("love", 0.5, 0.6),
    ("success", 0.3, 0.3),
    ("successful", 0.75, 0.95),
    ("strong", 0.43, 0.73),
    ("fair", 0.7, 0.9),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("hate", -0.8, 0.9),
    ("angry", -0.5, 1.0),
    ("furious", -0.9, 1.0),
    ("sad", -0.5, 1.0),
    ("disaster", -0.8, 0.9),
    ("disastrous", -1.0, 1.0),
    ("extreme", -0.13, 0.9),
    ("radical", 0.1, 0.6),
    ("reckless", -0.6, 0.8),
    ("corrupt", -0.6, 0.9),
    ("dangerous", -0.6, 0.9),
    ("failed", -0.5, 0.3),
    ("fails", -0.5, 0.3),
    ("crisis", -0.4, 0.6),
    ("obviously", 0.0, 0.5),
    ("clearly", 0.1, 0.38),
    ("undoubtedly", 0.0, 0.8),
];

/// Words that flip (and dampen) the polarity of the next lexicon hit.
const NEGATIONS: &[&str] = &["not", "never", "no", "isn't", "wasn't", "don't", "doesn't"];
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    /// -1 (negative) to 1 (positive).
    pub sentiment_score: f64,
    /// 0 (factual) to 1 (opinion).
    pub subjectivity_score: f64,
}

/// Score each section and average the sections that contain any lexicon word.
pub fn analyze_text(raw: &str) -> TextMetrics {
    let cleaned = text::normalize(raw);
    if cleaned.is_empty() {
        return TextMetrics::default();
    }

    let scored: Vec<(f64, f64)> = text::split_into_sections(&cleaned, DEFAULT_MAX_SECTION_LEN)
        .iter()
        .filter_map(|section| score(&section.text))
        .collect();
    if scored.is_empty() {
        return TextMetrics::default();
    }

    let n = scored.len() as f64;
    TextMetrics {
        sentiment_score: scored.iter().map(|(p, _)| p).sum::<f64>() / n,
        subjectivity_score: scored.iter().map(|(_, s)| s).sum::<f64>() / n,
    }
}

/// Mean polarity and subjectivity of lexicon hits, or None if there are none.
fn score(section: &str) -> Option<(f64, f64)> {
    let words: Vec<String> = section
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut hits = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let Some(&(_, polarity, subjectivity)) = LEXICON.iter().find(|(w, _, _)| w == word) else {
            continue;
        };
        let negated = i > 0 && NEGATIONS.contains(&words[i - 1].as_str());
        let polarity = if negated { polarity * NEGATION_FACTOR } else { polarity };
        hits.push((polarity, subjectivity));
    }

    if hits.is_empty() {
        return None;
    }
    let n = hits.len() as f64;
    Some((
        (hits.iter().map(|(p, _)| p).sum::<f64>() / n).clamp(-1.0, 1.0),
        (hits.iter().map(|(_, s)| s).sum::<f64>() / n).clamp(0.0, 1.0),
    ))
}
