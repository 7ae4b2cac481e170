//! Analyze and rewrite orchestration.
//!
//! Both entry points prepare the text the same way and cut it into the same
//! sections, then fan the sections out to a collaborator with bounded
//! concurrency. Results come back in section order regardless of which call
//! finished first. A section whose call fails or times out is degraded on its
//! own (no findings / original text) and never aborts the document.
//!
//! Dropping a returned future abandons any in-flight collaborator calls;
//! per-section results are owned values until the final merge, so there is no
//! shared state to leave half-written.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bias::{self, DocumentAnalysis, MissingContextItem, SectionVerdict};
use crate::collab::{BalanceRewriter, BiasClassifier, ContextDetector};
use crate::diff::{self, TextComparison};
use crate::error::PipelineError;
use crate::text::{self, Section, SentenceTokenizer, UnicodeTokenizer, DEFAULT_MAX_SECTION_LEN};

/// Runtime-tunable pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound on a section's length, in chars.
    pub max_section_len: usize,
    /// Content longer than this is split into sections; shorter content is sent whole.
    pub chunk_threshold: usize,
    /// Sections in flight at once per document.
    pub section_concurrency: usize,
    /// Per-call collaborator timeout.
    pub collaborator_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_section_len: DEFAULT_MAX_SECTION_LEN,
            chunk_threshold: 2000,
            section_concurrency: 4,
            collaborator_timeout_secs: 60,
        }
    }
}

/// Article text as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub source_url: Option<String>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

/// Output of a combined analyze + rewrite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedArticle {
    pub analysis: DocumentAnalysis,
    pub original: String,
    pub rewritten: String,
    pub comparison: TextComparison,
}

pub struct Pipeline {
    classifier: Arc<dyn BiasClassifier>,
    rewriter: Arc<dyn BalanceRewriter>,
    context: Arc<dyn ContextDetector>,
    tokenizer: Arc<dyn SentenceTokenizer>,
}

impl Pipeline {
    pub fn new(
        classifier: Arc<dyn BiasClassifier>,
        rewriter: Arc<dyn BalanceRewriter>,
        context: Arc<dyn ContextDetector>,
    ) -> Self {
        Self {
            classifier,
            rewriter,
            context,
            tokenizer: Arc::new(UnicodeTokenizer),
        }
    }

    /// Normalized main content of a document.
    ///
    /// Normalizes first, then filters boilerplate. If filtering leaves
    /// nothing, the whole normalized text is used instead; only a document
    /// with no text at all is rejected.
    pub fn prepare(&self, document: &Document) -> Result<String, PipelineError> {
        let whole = text::normalize(&document.text);
        let content = text::extract_main_content(&whole);
        if !content.is_empty() {
            return Ok(content);
        }

        if whole.is_empty() {
            return Err(PipelineError::Validation(
                "no article content provided".to_string(),
            ));
        }
        debug!(len = whole.len(), "boilerplate filter removed everything, using full text");
        Ok(whole)
    }

    pub fn sections(&self, content: &str, config: &PipelineConfig) -> Vec<Section> {
        text::plan_sections(
            self.tokenizer.as_ref(),
            content,
            config.chunk_threshold,
            config.max_section_len,
        )
    }

    pub async fn analyze(
        &self,
        document: &Document,
        config: &PipelineConfig,
    ) -> Result<DocumentAnalysis, PipelineError> {
        let content = self.prepare(document)?;
        let sections = self.sections(&content, config);
        info!(
            chars = content.chars().count(),
            sections = sections.len(),
            longest_section = sections.iter().map(Section::char_len).max().unwrap_or(0),
            "Analyzing document"
        );

        let (verdicts, missing_context) = futures::join!(
            self.classify_sections(&sections, config),
            self.detect_missing_context(&content, config),
        );

        let analysis = bias::assemble(verdicts, missing_context, document.source_url.clone());
        info!(
            bias_score = analysis.bias_score,
            instances = analysis.instances.len(),
            missing_context = analysis.missing_context.len(),
            "Analysis complete"
        );
        Ok(analysis)
    }

    pub async fn rewrite(
        &self,
        document: &Document,
        analysis: &DocumentAnalysis,
        config: &PipelineConfig,
    ) -> Result<String, PipelineError> {
        let content = self.prepare(document)?;
        let sections = self.sections(&content, config);
        Ok(self.rewrite_sections(&sections, analysis, config).await)
    }

    pub async fn analyze_and_rewrite(
        &self,
        document: &Document,
        config: &PipelineConfig,
    ) -> Result<BalancedArticle, PipelineError> {
        let analysis = self.analyze(document, config).await?;
        let original = self.prepare(document)?;
        let sections = self.sections(&original, config);
        let rewritten = self.rewrite_sections(&sections, &analysis, config).await;
        let comparison = diff::compare(&original, &rewritten);
        Ok(BalancedArticle {
            analysis,
            original,
            rewritten,
            comparison,
        })
    }

    async fn classify_sections(
        &self,
        sections: &[Section],
        config: &PipelineConfig,
    ) -> Vec<SectionVerdict> {
        let results = fan_out(sections, config, "classify", |section| {
            self.classifier.classify(&section.text)
        })
        .await;

        results
            .into_iter()
            .zip(sections)
            .map(|(result, section)| match result {
                Ok(verdict) => {
                    let unquoted = verdict
                        .bias_instances
                        .iter()
                        .filter(|i| !is_verbatim(&i.excerpt, &section.text))
                        .count();
                    if unquoted > 0 {
                        debug!(
                            section = section.index,
                            unquoted, "findings not quoted exactly from the section"
                        );
                    }
                    verdict
                }
                Err(e) => {
                    warn!(error = %e, "section contributes no findings");
                    SectionVerdict::default()
                }
            })
            .collect()
    }

    async fn detect_missing_context(
        &self,
        content: &str,
        config: &PipelineConfig,
    ) -> Vec<MissingContextItem> {
        let secs = config.collaborator_timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), self.context.detect(content)).await {
            Ok(Ok(items)) => items,
            Ok(Err(e)) => {
                warn!(error = %e, "missing-context detection failed");
                Vec::new()
            }
            Err(_) => {
                warn!(secs, "missing-context detection timed out");
                Vec::new()
            }
        }
    }

    async fn rewrite_sections(
        &self,
        sections: &[Section],
        analysis: &DocumentAnalysis,
        config: &PipelineConfig,
    ) -> String {
        let results = fan_out(sections, config, "rewrite", |section| {
            self.rewriter.rewrite(&section.text, analysis)
        })
        .await;

        results
            .into_iter()
            .zip(sections)
            .map(|(result, section)| match result {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "keeping original text for section");
                    section.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run `call` on every section, at most `section_concurrency` at a time, each
/// bounded by the collaborator timeout. Output order matches `sections`.
async fn fan_out<'a, T, F, Fut>(
    sections: &'a [Section],
    config: &PipelineConfig,
    stage: &'static str,
    call: F,
) -> Vec<Result<T, PipelineError>>
where
    T: Send + 'a,
    F: Fn(&'a Section) -> Fut + Send + Sync + 'a,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'a,
{
    let secs = config.collaborator_timeout_secs;
    stream::iter(sections)
        .map(|section| {
            let call = call(section);
            async move {
                match tokio::time::timeout(Duration::from_secs(secs), call).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(PipelineError::collaborator(stage, section.index, e)),
                    Err(_) => Err(PipelineError::Timeout {
                        stage,
                        section: section.index,
                        secs,
                    }),
                }
            }
        })
        .buffered(config.section_concurrency.max(1))
        .collect::<Vec<_>>()
        .boxed()
        .await
}

/// Excerpt appears in the section, ignoring differences in whitespace.
fn is_verbatim(excerpt: &str, section: &str) -> bool {
    let needle = text::normalize(excerpt);
    !needle.is_empty() && text::normalize(section).contains(&needle)
}
