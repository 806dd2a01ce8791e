//! Process-wide model store.
//!
//! Artifacts are read once at start-up and shared read-only between
//! requests. [`ModelStore::reload`] swaps in a freshly loaded model; if the
//! reload fails the previous model stays active. While no model has ever
//! loaded, each [`ModelStore::current`] call retries the load so a fixed
//! artifact directory is picked up without a restart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use curecanc_common::{CureError, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::artifacts::{load_model, ArtifactPaths};
use crate::predictor::Model;

#[derive(Default)]
struct Slot {
    model: Option<Arc<Model>>,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub model_loaded: bool,
    pub classifier: Option<&'static str>,
    pub features: Vec<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

pub struct ModelStore {
    paths: ArtifactPaths,
    slot: RwLock<Slot>,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("paths", &self.paths)
            .field("slot", &"<model>")
            .finish()
    }
}

impl ModelStore {
    /// An empty store; nothing is read until first use.
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths, slot: RwLock::new(Slot::default()) }
    }

    /// Create the store and attempt the initial load. A failed load is
    /// logged, not fatal: requests will report the model as unavailable.
    pub async fn open(paths: ArtifactPaths) -> Self {
        let store = Self::new(paths);
        if let Err(e) = store.reload().await {
            warn!("initial model load failed: {e}");
        }
        store
    }

    /// Wrap an already-built model (tests, embedding).
    pub fn with_model(paths: ArtifactPaths, model: Model) -> Self {
        let slot = Slot {
            model: Some(Arc::new(model)),
            loaded_at: Some(Utc::now()),
            last_error: None,
        };
        Self { paths, slot: RwLock::new(slot) }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// The active model, loading it first if none has loaded yet.
    pub async fn current(&self) -> Result<Arc<Model>> {
        {
            let slot = self.slot.read().await;
            if let Some(model) = &slot.model {
                return Ok(Arc::clone(model));
            }
        }
        self.reload().await
    }

    /// Re-read all artifacts and replace the active model on success.
    ///
    /// Files are read and parsed on the blocking pool; the slot is only
    /// locked to swap in the result.
    pub async fn reload(&self) -> Result<Arc<Model>> {
        let paths = self.paths.clone();
        let loaded = tokio::task::spawn_blocking(move || load_model(&paths))
            .await
            .map_err(|e| CureError::Other(anyhow::anyhow!("model load task failed: {e}")))?;

        let mut slot = self.slot.write().await;
        match loaded {
            Ok(model) => {
                let model = Arc::new(model);
                slot.model = Some(Arc::clone(&model));
                slot.loaded_at = Some(Utc::now());
                slot.last_error = None;
                info!(features = model.schema().len(), "model store updated");
                Ok(model)
            }
            Err(e) => {
                if slot.model.is_some() {
                    warn!("model reload failed, keeping previous model: {e}");
                }
                slot.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn status(&self) -> StoreStatus {
        let slot = self.slot.read().await;
        StoreStatus {
            model_loaded: slot.model.is_some(),
            classifier: slot.model.as_ref().map(|m| m.classifier_name()),
            features: slot
                .model
                .as_ref()
                .map(|m| m.schema().names().to_vec())
                .unwrap_or_default(),
            loaded_at: slot.loaded_at,
            last_error: slot.last_error.clone(),
        }
    }
}
