//! Shared application state for the web server.

use std::sync::Arc;

use curecanc_config::{Config, ModelConfig};
use curecanc_model::{ArtifactPaths, ModelStore};

use crate::session::SessionStore;

/// Shared state injected into every Axum handler.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Loaded model, replaced on `/api/model/reload`
    pub models: ModelStore,
    pub sessions: SessionStore,
}

pub fn artifact_paths(model: &ModelConfig) -> ArtifactPaths {
    ArtifactPaths {
        classifier: model.classifier_path.clone(),
        scaler: model.scaler_path.clone(),
        feature_names: model.feature_names_path.clone(),
    }
}

impl AppState {
    /// Build state from config, attempting the initial artifact load.
    pub async fn new(config: Config) -> Self {
        let models = ModelStore::open(artifact_paths(&config.model)).await;
        Self::with_store(config, models)
    }

    pub fn with_store(config: Config, models: ModelStore) -> Self {
        let sessions = SessionStore::with_capacity(config.session.max_sessions);
        Self { config, models, sessions }
    }
}

pub type SharedState = Arc<AppState>;
