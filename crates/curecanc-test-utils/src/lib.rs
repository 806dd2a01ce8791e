//! Shared fixtures: feature-name lists, artifact directories and
//! fixed-probability models.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use curecanc_model::{
    ArtifactPaths, FeatureSchema, LogisticRegression, Model, StandardScaler, INPUT_CONTROLS,
};
use serde_json::{json, Value};
use tempfile::TempDir;

pub use pretty_assertions;

/// The 30 columns of the Wisconsin diagnostic breast cancer dataset, in order.
pub const WDBC_FEATURES: [&str; 30] = [
    "radius_mean", "texture_mean", "perimeter_mean", "area_mean", "smoothness_mean",
    "compactness_mean", "concavity_mean", "concave points_mean", "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se", "texture_se", "perimeter_se", "area_se", "smoothness_se",
    "compactness_se", "concavity_se", "concave points_se", "symmetry_se",
    "fractal_dimension_se",
    "radius_worst", "texture_worst", "perimeter_worst", "area_worst", "smoothness_worst",
    "compactness_worst", "concavity_worst", "concave points_worst", "symmetry_worst",
    "fractal_dimension_worst",
];

/// Column names of the twelve input controls, in control order.
pub fn control_feature_names() -> Vec<String> {
    INPUT_CONTROLS.iter().map(|c| c.name.to_string()).collect()
}

pub fn wdbc_feature_names() -> Vec<String> {
    WDBC_FEATURES.iter().map(|s| s.to_string()).collect()
}

/// Intercept that makes a zero-coefficient logistic model return `p`.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Logistic model with zero coefficients and identity scaling: it returns
/// `p_malignant` for every input.
pub fn constant_model(names: &[String], p_malignant: f64) -> Model {
    let schema = Arc::new(FeatureSchema::new(names.iter().cloned()).expect("valid feature names"));
    let n = schema.len();
    let scaler = StandardScaler::new(vec![0.0; n], vec![1.0; n]);
    let classifier = LogisticRegression { coefficients: vec![0.0; n], intercept: logit(p_malignant) };
    Model::new(schema, scaler, Box::new(classifier)).expect("consistent model")
}

/// A temp directory holding the three artifact files.
pub struct ArtifactDir {
    dir: TempDir,
    pub paths: ArtifactPaths,
}

impl ArtifactDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite one artifact file with raw bytes.
    pub fn overwrite(&self, file: &str, bytes: &[u8]) {
        std::fs::write(self.dir.path().join(file), bytes).expect("write artifact");
    }
}

/// Write artifacts from explicit JSON documents.
pub fn write_artifacts(feature_names: &[String], scaler: Value, classifier: Value) -> ArtifactDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let paths = ArtifactPaths::in_dir(dir.path());
    std::fs::write(&paths.feature_names, json!(feature_names).to_string()).expect("write feature names");
    std::fs::write(&paths.scaler, scaler.to_string()).expect("write scaler");
    std::fs::write(&paths.classifier, classifier.to_string()).expect("write classifier");
    ArtifactDir { dir, paths }
}

/// Artifacts for [`constant_model`]: identity scaler, zero coefficients.
pub fn constant_artifacts(feature_names: &[String], p_malignant: f64) -> ArtifactDir {
    let n = feature_names.len();
    write_artifacts(
        feature_names,
        json!({ "mean": vec![0.0; n], "scale": vec![1.0; n], "feature_names": feature_names }),
        json!({
            "kind": "logistic_regression",
            "coefficients": vec![0.0; n],
            "intercept": logit(p_malignant),
        }),
    )
}

/// The demo artifact set shipped in the repository's `model/` directory.
pub fn demo_model_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../model")
}
