//! External capabilities the pipeline calls but does not implement.
//!
//! Each is a trait so the pipeline can be handed an LLM-backed implementation
//! in production and a scripted one in tests.

pub mod llm;
pub mod prompts;
pub mod reply;
pub mod rules;

use anyhow::Result;
use async_trait::async_trait;

use crate::bias::{DocumentAnalysis, MissingContextItem, SectionVerdict};

pub use llm::LlmCollaborator;
pub use rules::{FallbackClassifier, RuleClassifier};

#[async_trait]
pub trait BiasClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SectionVerdict>;
}

#[async_trait]
pub trait BalanceRewriter: Send + Sync {
    /// Rewrite one section. `guidance` is the whole-document analysis; the
    /// implementation decides which parts of it apply to this section.
    async fn rewrite(&self, text: &str, guidance: &DocumentAnalysis) -> Result<String>;
}

#[async_trait]
pub trait ContextDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<Vec<MissingContextItem>>;
}
