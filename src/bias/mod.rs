//! Bias findings and the document-level analysis built from them.

pub mod aggregate;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub use aggregate::{assemble, bias_score, merge_sections, BiasLevel, SeverityBand};

/// The six recognised bias categories, plus whatever else a classifier says.
///
/// `Other` keeps the raw label so the instance survives a round trip; it is
/// never counted in `BiasCategoryCounts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BiasCategory {
    Political,
    Emotional,
    Framing,
    Source,
    Factual,
    Omission,
    Other(String),
}

impl BiasCategory {
    pub const KNOWN: [BiasCategory; 6] = [
        BiasCategory::Political,
        BiasCategory::Emotional,
        BiasCategory::Framing,
        BiasCategory::Source,
        BiasCategory::Factual,
        BiasCategory::Omission,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Political => "political",
            Self::Emotional => "emotional",
            Self::Framing => "framing",
            Self::Source => "source",
            Self::Factual => "factual",
            Self::Omission => "omission",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for BiasCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "political" => Self::Political,
            "emotional" => Self::Emotional,
            "framing" => Self::Framing,
            "source" => Self::Source,
            "factual" => Self::Factual,
            "omission" => Self::Omission,
            _ => Self::Other(raw),
        }
    }
}

impl From<BiasCategory> for String {
    fn from(category: BiasCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for BiasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flagged excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasInstance {
    /// Verbatim text from the section it was found in.
    #[serde(alias = "text")]
    pub excerpt: String,
    #[serde(default = "other_category")]
    pub category: BiasCategory,
    /// 1-10.
    #[serde(deserialize_with = "one_to_ten")]
    pub severity: u8,
    #[serde(default)]
    pub balanced_alternative: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_context: Option<String>,
}

fn other_category() -> BiasCategory {
    BiasCategory::Other("other".to_string())
}

/// Per-category instance counts. All six keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasCategoryCounts {
    pub political: u32,
    pub emotional: u32,
    pub framing: u32,
    pub source: u32,
    pub factual: u32,
    pub omission: u32,
}

impl BiasCategoryCounts {
    /// Count one instance. Returns false, and counts nothing, for `Other`.
    pub fn increment(&mut self, category: &BiasCategory) -> bool {
        let slot = match category {
            BiasCategory::Political => &mut self.political,
            BiasCategory::Emotional => &mut self.emotional,
            BiasCategory::Framing => &mut self.framing,
            BiasCategory::Source => &mut self.source,
            BiasCategory::Factual => &mut self.factual,
            BiasCategory::Omission => &mut self.omission,
            BiasCategory::Other(_) => return false,
        };
        *slot += 1;
        true
    }

    pub fn get(&self, category: &BiasCategory) -> u32 {
        match category {
            BiasCategory::Political => self.political,
            BiasCategory::Emotional => self.emotional,
            BiasCategory::Framing => self.framing,
            BiasCategory::Source => self.source,
            BiasCategory::Factual => self.factual,
            BiasCategory::Omission => self.omission,
            BiasCategory::Other(_) => 0,
        }
    }

    pub fn total(&self) -> u32 {
        BiasCategory::KNOWN.iter().map(|c| self.get(c)).sum()
    }

    /// Keyed by category name, for cross-document comparison.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BiasCategory::KNOWN
            .iter()
            .map(|c| (c.as_str().to_string(), self.get(c) as f64))
            .collect()
    }
}

/// A statement that needs context the article leaves out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingContextItem {
    pub statement: String,
    pub context: String,
    #[serde(default)]
    pub sources: Vec<String>,
    /// 1-10.
    #[serde(deserialize_with = "one_to_ten")]
    pub importance: u8,
}

/// What a classifier returns for one section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionVerdict {
    /// The classifier's own 0-10 estimate; informational only.
    #[serde(default)]
    pub bias_score: f64,
    #[serde(default)]
    pub bias_instances: Vec<BiasInstance>,
}

/// Whole-document result. Rebuilt from scratch on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// 0-100.
    pub bias_score: f64,
    pub categories: BiasCategoryCounts,
    /// Section order, then order within the section.
    pub instances: Vec<BiasInstance>,
    pub missing_context: Vec<MissingContextItem>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl DocumentAnalysis {
    pub fn level(&self) -> BiasLevel {
        BiasLevel::from_score(self.bias_score)
    }
}

/// Models hand back severities as ints, floats or strings; clamp whatever
/// arrives into 1-10.
fn one_to_ten<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("expected a 1-10 score, got {}", value)))?;
    Ok(number.round().clamp(1.0, 10.0) as u8)
}
