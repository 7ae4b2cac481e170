use super::{BiasCategoryCounts, BiasInstance, DocumentAnalysis, MissingContextItem, SectionVerdict};

/// Mean severity (1-10) is multiplied by this to land on the 0-100 scale.
/// Fixed for compatibility with scores already handed out; do not retune.
pub const SEVERITY_SCALE: f64 = 20.0;

pub const MAX_BIAS_SCORE: f64 = 100.0;

/// Concatenate per-section instances in section order and tally categories.
///
/// Instances with an unrecognised category stay in the list but are not
/// counted, so `categories.total()` can be less than `instances.len()`.
pub fn merge_sections(verdicts: Vec<SectionVerdict>) -> (Vec<BiasInstance>, BiasCategoryCounts) {
    let mut instances = Vec::new();
    let mut counts = BiasCategoryCounts::default();

    for verdict in verdicts {
        for instance in verdict.bias_instances {
            counts.increment(&instance.category);
            instances.push(instance);
        }
    }
    (instances, counts)
}

/// `min(100, mean_severity * 20)`, or 0 when nothing was flagged.
pub fn bias_score(instances: &[BiasInstance]) -> f64 {
    if instances.is_empty() {
        return 0.0;
    }
    let total: f64 = instances.iter().map(|i| i.severity as f64).sum();
    let mean = total / instances.len() as f64;
    (mean * SEVERITY_SCALE).min(MAX_BIAS_SCORE)
}

/// Build the document result from section verdicts (already in section order).
pub fn assemble(
    verdicts: Vec<SectionVerdict>,
    missing_context: Vec<MissingContextItem>,
    source_url: Option<String>,
) -> DocumentAnalysis {
    let (instances, categories) = merge_sections(verdicts);
    DocumentAnalysis {
        bias_score: bias_score(&instances),
        categories,
        instances,
        missing_context,
        source_url,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasLevel {
    Low,
    Medium,
    High,
}

impl BiasLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            Self::Low
        } else if score <= 70.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Bias",
            Self::Medium => "Medium Bias",
            Self::High => "High Bias",
        }
    }

    pub fn assessment(self) -> &'static str {
        match self {
            Self::Low => "This article presents the subject in a relatively balanced way.",
            Self::Medium => "This article shows some bias that may shape how readers see the topic.",
            Self::High => "This article carries significant bias that strongly colours its presentation.",
        }
    }
}

/// Display band for a 1-10 severity or importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBand {
    Low,
    Medium,
    High,
}

impl SeverityBand {
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            0..=3 => Self::Low,
            4..=7 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Low => "🟢",
            Self::Medium => "🟡",
            Self::High => "🔴",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::BiasCategory;

    fn instance(category: BiasCategory, severity: u8) -> BiasInstance {
        BiasInstance {
            excerpt: format!("{} excerpt", category),
            category,
            severity,
            balanced_alternative: String::new(),
            missing_context: None,
        }
    }

    #[test]
    fn test_bias_score_empty_is_zero() {
        assert_eq!(bias_score(&[]), 0.0);
    }

    #[test]
    fn test_bias_score_scaling_and_cap() {
        let mid = vec![instance(BiasCategory::Political, 5)];
        assert_eq!(bias_score(&mid), 100.0);

        let low = vec![
            instance(BiasCategory::Framing, 1),
            instance(BiasCategory::Framing, 2),
        ];
        assert_eq!(bias_score(&low), 30.0);

        let high = vec![instance(BiasCategory::Emotional, 10)];
        assert_eq!(bias_score(&high), MAX_BIAS_SCORE);
    }

    #[test]
    fn test_bias_score_monotonic_in_mean_severity() {
        let mut last = 0.0;
        for severity in 1..=10u8 {
            let score = bias_score(&[instance(BiasCategory::Source, severity)]);
            assert!(score >= last);
            assert!(score <= MAX_BIAS_SCORE);
            last = score;
        }
    }

    #[test]
    fn test_merge_keeps_section_order_and_drops_unknown_from_counts() {
        let verdicts = vec![
            SectionVerdict {
                bias_score: 4.0,
                bias_instances: vec![
                    instance(BiasCategory::Political, 6),
                    instance(BiasCategory::Other("loaded".into()), 3),
                ],
            },
            SectionVerdict::default(),
            SectionVerdict {
                bias_score: 2.0,
                bias_instances: vec![instance(BiasCategory::Omission, 2)],
            },
        ];
        let (instances, counts) = merge_sections(verdicts);
        assert_eq!(
            instances.iter().map(|i| i.category.as_str()).collect::<Vec<_>>(),
            vec!["political", "loaded", "omission"]
        );
        assert_eq!(counts.political, 1);
        assert_eq!(counts.omission, 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_assemble() {
        let verdicts = vec![SectionVerdict {
            bias_score: 3.0,
            bias_instances: vec![instance(BiasCategory::Factual, 2)],
        }];
        let analysis = assemble(verdicts, vec![], Some("https://example.com/a".into()));
        assert_eq!(analysis.bias_score, 40.0);
        assert_eq!(analysis.categories.factual, 1);
        assert_eq!(analysis.level(), BiasLevel::Medium);
        assert_eq!(analysis.source_url.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn test_levels() {
        assert_eq!(BiasLevel::from_score(30.0), BiasLevel::Low);
        assert_eq!(BiasLevel::from_score(30.5), BiasLevel::Medium);
        assert_eq!(BiasLevel::from_score(71.0), BiasLevel::High);
        assert_eq!(SeverityBand::from_severity(3), SeverityBand::Low);
        assert_eq!(SeverityBand::from_severity(7), SeverityBand::Medium);
        assert_eq!(SeverityBand::from_severity(8), SeverityBand::High);
    }
}
