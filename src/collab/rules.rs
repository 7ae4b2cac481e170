use std::sync::{Arc, LazyLock};

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use tracing::warn;

use super::BiasClassifier;
use crate::bias::{BiasCategory, BiasInstance, SectionVerdict};

struct Rule {
    pattern: Regex,
    category: BiasCategory,
    severity: u8,
    advice: &'static str,
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule {
            pattern: Regex::new(r"(?i)\b(always|never|everyone|nobody)\b").unwrap(),
            category: BiasCategory::Factual,
            severity: 4,
            advice: "State how often or how many instead of an absolute.",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(must|should|ought to)\b").unwrap(),
            category: BiasCategory::Framing,
            severity: 3,
            advice: "Attribute the recommendation to whoever is making it.",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(obviously|clearly|undoubtedly)\b").unwrap(),
            category: BiasCategory::Framing,
            severity: 4,
            advice: "Drop the certainty marker and let the evidence carry the claim.",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(hate|love|angry|happy|sad|furious|delighted)\b").unwrap(),
            category: BiasCategory::Emotional,
            severity: 5,
            advice: "Describe the action or quote the person rather than the feeling.",
        },
        Rule {
            pattern: Regex::new(r"(?i)\b(terrible|amazing|awful|wonderful|horrible)\b").unwrap(),
            category: BiasCategory::Emotional,
            severity: 5,
            advice: "Replace the value judgement with the specific outcome.",
        },
    ]
});

/// Keyword classifier. Deterministic, offline, and much cruder than a model.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleClassifier;

impl RuleClassifier {
    pub fn verdict(&self, text: &str) -> SectionVerdict {
        let mut hits: Vec<(usize, BiasInstance)> = RULES
            .iter()
            .flat_map(|rule| {
                rule.pattern.find_iter(text).map(move |m| {
                    (
                        m.start(),
                        BiasInstance {
                            excerpt: m.as_str().to_string(),
                            category: rule.category.clone(),
                            severity: rule.severity,
                            balanced_alternative: rule.advice.to_string(),
                            missing_context: None,
                        },
                    )
                })
            })
            .collect();
        hits.sort_by_key(|(start, _)| *start);

        let bias_instances: Vec<BiasInstance> = hits.into_iter().map(|(_, i)| i).collect();
        let bias_score = if bias_instances.is_empty() {
            0.0
        } else {
            bias_instances.iter().map(|i| i.severity as f64).sum::<f64>()
                / bias_instances.len() as f64
        };
        SectionVerdict {
            bias_score,
            bias_instances,
        }
    }
}

#[async_trait]
impl BiasClassifier for RuleClassifier {
    async fn classify(&self, text: &str) -> Result<SectionVerdict> {
        Ok(self.verdict(text))
    }
}

/// Uses `primary`, and the rule classifier's verdict when `primary` errors.
pub struct FallbackClassifier {
    primary: Arc<dyn BiasClassifier>,
    fallback: RuleClassifier,
}

impl FallbackClassifier {
    pub fn new(primary: Arc<dyn BiasClassifier>) -> Self {
        Self {
            primary,
            fallback: RuleClassifier,
        }
    }
}

#[async_trait]
impl BiasClassifier for FallbackClassifier {
    async fn classify(&self, text: &str) -> Result<SectionVerdict> {
        match self.primary.classify(text).await {
            Ok(verdict) => Ok(verdict),
            Err(e) => {
                warn!(error = %e, "classifier unavailable, using keyword rules");
                Ok(self.fallback.verdict(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Down;

    #[async_trait]
    impl BiasClassifier for Down {
        async fn classify(&self, _text: &str) -> Result<SectionVerdict> {
            anyhow::bail!("503 Service Unavailable")
        }
    }

    #[test]
    fn test_rules_flag_in_text_order() {
        let verdict = RuleClassifier.verdict(
            "Everyone knows this terrible bill should obviously fail.",
        );
        let found: Vec<(&str, &str)> = verdict
            .bias_instances
            .iter()
            .map(|i| (i.excerpt.as_str(), i.category.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Everyone", "factual"),
                ("terrible", "emotional"),
                ("should", "framing"),
                ("obviously", "framing"),
            ]
        );
        assert_eq!(verdict.bias_score, 4.0);
    }

    #[test]
    fn test_rules_whole_words_only() {
        let verdict = RuleClassifier.verdict("The lovely mustard was unhappy.");
        assert!(verdict.bias_instances.is_empty());
        assert_eq!(verdict.bias_score, 0.0);
    }

    #[tokio::test]
    async fn test_fallback_classifier_degrades_to_rules() {
        let classifier = FallbackClassifier::new(Arc::new(Down));
        let verdict = classifier.classify("They always lie.").await.unwrap();
        assert_eq!(verdict.bias_instances.len(), 1);
        assert_eq!(verdict.bias_instances[0].excerpt, "always");
    }
}
