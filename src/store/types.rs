use serde::{Deserialize, Serialize};

use crate::bias::DocumentAnalysis;
use crate::sentiment::TextMetrics;

/// Content-addressed analysis ID (blake3 hex hash of the prepared text).
pub type AnalysisId = String;

/// Score given to a domain the first time it is looked up.
pub const DEFAULT_CREDIBILITY: f64 = 0.5;

/// Stored credibility for a news domain. Written once, never re-scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityRecord {
    pub domain: String,
    /// 0-1.
    pub score: f64,
}

/// An analysis kept for cross-article comparison under a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAnalysis {
    pub id: AnalysisId,
    pub topic: String,
    /// First words of the article, for listings.
    pub headline: String,
    pub analysis: DocumentAnalysis,
    pub metrics: TextMetrics,
    pub saved_at: i64,
}
