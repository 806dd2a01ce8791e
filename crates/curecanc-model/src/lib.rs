//! curecanc-model: Inference against the pre-trained tumour classifier.
//!
//! Input controls → partial vector → reconciled vector (shared
//! [`FeatureSchema`]) → standard scaler → classifier → [`Prediction`].

pub mod schema;
pub mod features;
pub mod scaler;
pub mod classifier;
pub mod artifacts;
pub mod predictor;
pub mod store;

pub use schema::FeatureSchema;
pub use features::{
    find_control, reconcile, FeatureControl, PartialVector, ReconciledVector, INPUT_CONTROLS,
};
pub use scaler::StandardScaler;
pub use classifier::{
    Classifier, ClassifierArtifact, DecisionTree, Diagnosis, LogisticRegression, RandomForest,
};
pub use artifacts::{ArtifactPaths, load_model};
pub use predictor::{Model, Prediction};
pub use store::{ModelStore, StoreStatus};
