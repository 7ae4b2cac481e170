//! Statistics across several analysed articles about the same story.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mean squared deviation from the mean; 0 for no values.
pub fn sentiment_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Cosine of the angle between two vectors; 0 when either has zero length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Mean pairwise cosine similarity of category distributions.
///
/// Each map becomes a vector over the sorted union of all keys (missing keys
/// count as 0). Fewer than two maps gives 0.
pub fn bias_similarity(category_maps: &[BTreeMap<String, f64>]) -> f64 {
    let keys: BTreeSet<&String> = category_maps.iter().flat_map(|m| m.keys()).collect();
    let vectors: Vec<Vec<f64>> = category_maps
        .iter()
        .map(|m| keys.iter().map(|k| m.get(*k).copied().unwrap_or(0.0)).collect())
        .collect();

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..vectors.len() {
        for j in i + 1..vectors.len() {
            total += cosine_similarity(&vectors[i], &vectors[j]);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

/// Context reported for one article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContext {
    #[serde(default)]
    pub related_events: Vec<String>,
    #[serde(default)]
    pub missing_context: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextOverlap {
    pub event_overlap: f64,
    pub missing_context_overlap: f64,
}

/// Distinct items over total items, separately for events and missing context.
///
/// 1.0 means no article repeats anything another reported; lower values mean
/// more shared items. The divisor is at least 1.
pub fn context_overlap(contexts: &[ArticleContext]) -> ContextOverlap {
    ContextOverlap {
        event_overlap: distinct_ratio(contexts.iter().map(|c| &c.related_events)),
        missing_context_overlap: distinct_ratio(contexts.iter().map(|c| &c.missing_context)),
    }
}

fn distinct_ratio<'a, I>(lists: I) -> f64
where
    I: Iterator<Item = &'a Vec<String>> + Clone,
{
    let distinct: BTreeSet<&String> = lists.clone().flatten().collect();
    let total: usize = lists.map(Vec::len).sum();
    distinct.len() as f64 / total.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(items: &[(&str, f64)]) -> BTreeMap<String, f64> {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_variance() {
        assert_eq!(sentiment_variance(&[]), 0.0);
        assert_eq!(sentiment_variance(&[0.4]), 0.0);
        assert!((sentiment_variance(&[1.0, 2.0, 3.0, 4.0]) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_identical_distributions_are_fully_similar() {
        let maps = vec![map(&[("political", 1.0)]), map(&[("political", 1.0)])];
        assert!((bias_similarity(&maps) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_uses_union_of_keys() {
        let maps = vec![map(&[("political", 1.0)]), map(&[("emotional", 3.0)])];
        assert_eq!(bias_similarity(&maps), 0.0);

        let maps = vec![
            map(&[("political", 1.0), ("emotional", 1.0)]),
            map(&[("political", 1.0)]),
        ];
        assert!((bias_similarity(&maps) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_zero_vector_pair_counts_as_zero() {
        let maps = vec![
            map(&[("political", 2.0)]),
            map(&[("political", 2.0)]),
            map(&[("political", 0.0)]),
        ];
        // pairs: 1.0, 0.0, 0.0
        assert!((bias_similarity(&maps) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_needs_two_documents() {
        assert_eq!(bias_similarity(&[]), 0.0);
        assert_eq!(bias_similarity(&[map(&[("framing", 4.0)])]), 0.0);
    }

    #[test]
    fn test_context_overlap() {
        let contexts = vec![
            ArticleContext {
                related_events: strings(&["vote", "protest"]),
                missing_context: strings(&["budget history"]),
            },
            ArticleContext {
                related_events: strings(&["vote"]),
                missing_context: strings(&["polling data"]),
            },
        ];
        let overlap = context_overlap(&contexts);
        assert!((overlap.event_overlap - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(overlap.missing_context_overlap, 1.0);
    }

    #[test]
    fn test_context_overlap_empty_input() {
        assert_eq!(context_overlap(&[]), ContextOverlap::default());
    }
}
