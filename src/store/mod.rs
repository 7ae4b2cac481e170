pub mod fetch;
pub mod types;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use cnidarium::{StateDelta, StateRead, StateWrite, Storage};
use futures::StreamExt;
use tracing::{debug, warn};

use crate::bias::DocumentAnalysis;
use crate::sentiment::TextMetrics;
use types::{AnalysisId, CredibilityRecord, SavedAnalysis, DEFAULT_CREDIBILITY};

// Key prefixes, no trailing slashes
const CREDIBILITY_PREFIX: &str = "cred";
const ANALYSIS_PREFIX: &str = "analysis";

/// Headline length kept with a saved analysis, in chars.
const HEADLINE_CHARS: usize = 80;

fn credibility_key(domain: &str) -> String {
    format!("{}/{}", CREDIBILITY_PREFIX, domain)
}
fn analysis_key(topic: &str, id: &str) -> String {
    format!("{}/{}/{}", ANALYSIS_PREFIX, topic, id)
}

/// Trimmed topic name, or an error if it is empty or would nest under another topic.
pub fn validate_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    anyhow::ensure!(!topic.is_empty(), "topic is empty");
    anyhow::ensure!(!topic.contains('/'), "topic must not contain '/'");
    Ok(topic)
}

/// Host of a URL, lower-cased, without a leading `www.`.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

pub struct AnalysisStore {
    storage: Storage,
}

impl AnalysisStore {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let prefixes = vec![CREDIBILITY_PREFIX.to_string(), ANALYSIS_PREFIX.to_string()];
        let storage = Storage::load(data_dir.to_path_buf(), prefixes)
            .await
            .context("Failed to init cnidarium storage")?;
        Ok(Self { storage })
    }

    /// Credibility score for a domain, recording the default on first lookup.
    pub async fn credibility(&self, domain: &str) -> Result<CredibilityRecord> {
        let domain = domain.trim().to_lowercase();
        anyhow::ensure!(!domain.is_empty(), "domain is empty");

        let snapshot = self.storage.latest_snapshot();
        if let Some(bytes) = snapshot.get_raw(&credibility_key(&domain)).await? {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let record = CredibilityRecord {
            domain: domain.clone(),
            score: DEFAULT_CREDIBILITY,
        };
        let mut delta = StateDelta::new(snapshot);
        delta.put_raw(
            credibility_key(&domain),
            serde_json::to_vec(&record).context("serialize credibility")?,
        );
        self.storage.commit(delta).await?;
        debug!(domain, score = record.score, "credibility recorded");
        Ok(record)
    }

    /// Save an analysis under a topic. Idempotent: same text, same ID.
    pub async fn save_analysis(
        &self,
        topic: &str,
        content: &str,
        analysis: &DocumentAnalysis,
        metrics: TextMetrics,
    ) -> Result<AnalysisId> {
        let topic = validate_topic(topic)?;
        let id = blake3::hash(content.as_bytes()).to_hex().to_string();
        let record = SavedAnalysis {
            id: id.clone(),
            topic: topic.to_string(),
            headline: content.chars().take(HEADLINE_CHARS).collect(),
            analysis: analysis.clone(),
            metrics,
            saved_at: chrono::Utc::now().timestamp(),
        };

        let snapshot = self.storage.latest_snapshot();
        let mut delta = StateDelta::new(snapshot);
        delta.put_raw(
            analysis_key(topic, &id),
            serde_json::to_vec(&record).context("serialize SavedAnalysis")?,
        );
        self.storage.commit(delta).await?;
        debug!(analysis_id = %id, topic, "analysis saved");
        Ok(id)
    }

    /// Saved analyses for one topic, newest first.
    pub async fn analyses(&self, topic: &str) -> Result<Vec<SavedAnalysis>> {
        let topic = validate_topic(topic)?;
        let prefix = format!("{}/{}/", ANALYSIS_PREFIX, topic);
        let mut results = self.scan(&prefix).await;
        results.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(results)
    }

    /// Every saved analysis, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<SavedAnalysis>> {
        let mut results = self.scan(ANALYSIS_PREFIX).await;
        results.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        results.truncate(limit);
        Ok(results)
    }

    /// Topic names that have at least one saved analysis.
    pub async fn topics(&self) -> Result<Vec<String>> {
        let topics: BTreeSet<String> = self
            .scan(ANALYSIS_PREFIX)
            .await
            .into_iter()
            .map(|a| a.topic)
            .collect();
        Ok(topics.into_iter().collect())
    }

    async fn scan(&self, prefix: &str) -> Vec<SavedAnalysis> {
        let snapshot = self.storage.latest_snapshot();
        let mut stream = snapshot.prefix_raw(prefix);
        let mut results = Vec::new();

        while let Some(entry) = stream.next().await {
            match entry {
                Ok((key, value)) => match serde_json::from_slice::<SavedAnalysis>(&value) {
                    Ok(record) => results.push(record),
                    Err(e) => warn!(key, "Skipping unreadable analysis: {}", e),
                },
                Err(e) => {
                    warn!("Error reading analysis stream: {}", e);
                }
            }
        }
        results
    }
}
