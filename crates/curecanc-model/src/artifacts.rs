//! Artifact loader: classifier, scaler and feature-name list from JSON files.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use curecanc_common::{CureError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::ClassifierArtifact;
use crate::predictor::Model;
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

pub const CLASSIFIER: &str = "classifier";
pub const SCALER: &str = "scaler";
pub const FEATURE_NAMES: &str = "feature_names";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
    pub feature_names: PathBuf,
}

impl ArtifactPaths {
    /// `model.json`, `scaler.json` and `feature_names.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join("model.json"),
            scaler: dir.join("scaler.json"),
            feature_names: dir.join("feature_names.json"),
        }
    }
}

fn unavailable(artifact: &'static str, path: &Path, reason: impl Display) -> CureError {
    CureError::ModelUnavailable {
        artifact,
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn read_json<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| unavailable(artifact, path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| unavailable(artifact, path, e))
}

/// Read and cross-check all three artifacts.
///
/// Every failure, I/O, parse or inconsistency, surfaces as
/// [`CureError::ModelUnavailable`] naming the offending artifact.
pub fn load_model(paths: &ArtifactPaths) -> Result<Model> {
    let names: Vec<String> = read_json(FEATURE_NAMES, &paths.feature_names)?;
    let schema = FeatureSchema::new(names)
        .map_err(|e| unavailable(FEATURE_NAMES, &paths.feature_names, e))?;

    let scaler: StandardScaler = read_json(SCALER, &paths.scaler)?;
    scaler.validate().map_err(|e| unavailable(SCALER, &paths.scaler, e))?;
    if scaler.n_features() != schema.len() {
        return Err(unavailable(
            SCALER,
            &paths.scaler,
            format!("fitted on {} features, feature list has {}", scaler.n_features(), schema.len()),
        ));
    }
    if let Some(fitted) = &scaler.feature_names {
        if fitted.as_slice() != schema.names() {
            return Err(unavailable(
                SCALER,
                &paths.scaler,
                "fitted feature order differs from the feature-name list",
            ));
        }
    }

    let artifact: ClassifierArtifact = read_json(CLASSIFIER, &paths.classifier)?;
    artifact.validate().map_err(|e| unavailable(CLASSIFIER, &paths.classifier, e))?;
    if artifact.n_features() != schema.len() {
        return Err(unavailable(
            CLASSIFIER,
            &paths.classifier,
            format!("expects {} features, feature list has {}", artifact.n_features(), schema.len()),
        ));
    }

    let kind = artifact.kind();
    let features = schema.len();
    let model = Model::new(Arc::new(schema), scaler, artifact.into_classifier())
        .map_err(|e| unavailable(CLASSIFIER, &paths.classifier, e))?;

    info!(
        classifier = kind,
        features,
        path = %paths.classifier.display(),
        "model artifacts loaded"
    );
    Ok(model)
}
