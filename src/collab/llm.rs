use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::prompts::{self, CLASSIFY_SYSTEM_PROMPT, CONTEXT_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT};
use super::reply;
use super::{BalanceRewriter, BiasClassifier, ContextDetector};
use crate::bias::{DocumentAnalysis, MissingContextItem, SectionVerdict};
use crate::llm::LlmClient;

/// Low temperature for structured output, a little more for prose.
const JSON_TEMPERATURE: f32 = 0.1;
const REWRITE_TEMPERATURE: f32 = 0.3;

/// All three collaborators backed by one chat model.
pub struct LlmCollaborator {
    llm: Arc<LlmClient>,
}

impl LlmCollaborator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl BiasClassifier for LlmCollaborator {
    async fn classify(&self, text: &str) -> Result<SectionVerdict> {
        let response = self
            .llm
            .complete(CLASSIFY_SYSTEM_PROMPT, text, JSON_TEMPERATURE)
            .await?;
        debug!(response_len = response.len(), "classifier reply");
        reply::parse_verdict(&response)
    }
}

#[async_trait]
impl ContextDetector for LlmCollaborator {
    async fn detect(&self, text: &str) -> Result<Vec<MissingContextItem>> {
        let response = self
            .llm
            .complete(CONTEXT_SYSTEM_PROMPT, text, JSON_TEMPERATURE)
            .await?;
        debug!(response_len = response.len(), "context reply");
        reply::parse_missing_context(&response)
    }
}

#[async_trait]
impl BalanceRewriter for LlmCollaborator {
    async fn rewrite(&self, text: &str, guidance: &DocumentAnalysis) -> Result<String> {
        let notes = section_guidance(text, guidance);
        let request = prompts::rewrite_request(text, &notes);
        let response = self
            .llm
            .complete(REWRITE_SYSTEM_PROMPT, &request, REWRITE_TEMPERATURE)
            .await?;
        reply::clean_rewrite(&response).context("rewriter returned no text")
    }
}

/// One line per flagged instance whose excerpt appears in this section.
pub fn section_guidance(section: &str, analysis: &DocumentAnalysis) -> Vec<String> {
    analysis
        .instances
        .iter()
        .filter(|i| !i.excerpt.is_empty() && section.contains(i.excerpt.as_str()))
        .map(|i| {
            let mut line = format!(
                "- \"{}\" ({}, severity {}/10) -> \"{}\"",
                i.excerpt, i.category, i.severity, i.balanced_alternative
            );
            if let Some(ctx) = &i.missing_context {
                line.push_str(&format!("; context: {}", ctx));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::{BiasCategory, BiasCategoryCounts, BiasInstance};

    #[test]
    fn test_section_guidance_only_covers_this_section() {
        let analysis = DocumentAnalysis {
            bias_score: 60.0,
            categories: BiasCategoryCounts::default(),
            instances: vec![
                BiasInstance {
                    excerpt: "radical left".into(),
                    category: BiasCategory::Political,
                    severity: 7,
                    balanced_alternative: "progressive lawmakers".into(),
                    missing_context: Some("The bill had bipartisan co-sponsors".into()),
                },
                BiasInstance {
                    excerpt: "doomed scheme".into(),
                    category: BiasCategory::Emotional,
                    severity: 5,
                    balanced_alternative: "proposal".into(),
                    missing_context: None,
                },
            ],
            missing_context: vec![],
            source_url: None,
        };

        let notes = section_guidance("The radical left pushed an extreme bill.", &analysis);
        assert_eq!(notes.len(), 1);
        assert_eq!(
            notes[0],
            "- \"radical left\" (political, severity 7/10) -> \"progressive lawmakers\"; \
             context: The bill had bipartisan co-sponsors"
        );
    }
}
