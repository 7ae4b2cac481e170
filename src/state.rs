use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pipeline::{Pipeline, PipelineConfig};
use crate::store::AnalysisStore;

pub struct AppState {
    pub store: Arc<AnalysisStore>,
    pub pipeline: Arc<Pipeline>,
    pub admin_ids: HashSet<u64>,
    /// Admins can modify at runtime via `/bias config`.
    pub config: Arc<RwLock<PipelineConfig>>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Copy of the current config, so no lock is held across collaborator calls.
    pub async fn pipeline_config(&self) -> PipelineConfig {
        *self.config.read().await
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
