//! The loaded model: schema + scaler + classifier, and the prediction step.

use std::sync::Arc;

use curecanc_common::{CureError, Result};
use serde::Serialize;

use crate::classifier::{Classifier, Diagnosis};
use crate::features::{reconcile, PartialVector, ReconciledVector};
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

/// Tolerance for the two class probabilities summing to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    pub probability_benign: f64,
    pub probability_malignant: f64,
}

impl Prediction {
    /// Build from a `[benign, malignant]` pair. The label always agrees with
    /// the larger probability (ties → benign).
    pub fn from_probabilities(proba: [f64; 2]) -> Result<Self> {
        let [benign, malignant] = proba;
        if !(benign.is_finite() && malignant.is_finite()) || benign < 0.0 || malignant < 0.0 {
            return Err(CureError::Other(anyhow::anyhow!(
                "classifier returned invalid probabilities [{benign}, {malignant}]"
            )));
        }
        let total = benign + malignant;
        if total <= 0.0 {
            return Err(CureError::Other(anyhow::anyhow!("classifier returned zero probability mass")));
        }
        let (benign, malignant) = (benign / total, malignant / total);
        let diagnosis = if malignant > benign { Diagnosis::Malignant } else { Diagnosis::Benign };
        Ok(Self { diagnosis, probability_benign: benign, probability_malignant: malignant })
    }

    pub fn probabilities(&self) -> [f64; 2] {
        [self.probability_benign, self.probability_malignant]
    }

    pub fn probability_of(&self, diagnosis: Diagnosis) -> f64 {
        self.probabilities()[diagnosis.class_index()]
    }
}

pub struct Model {
    schema: Arc<FeatureSchema>,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("features", &self.schema.len())
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

impl Model {
    /// Assemble a model. Scaler and classifier widths must equal the schema
    /// length, and a named scaler must list the schema's names in order.
    pub fn new(
        schema: Arc<FeatureSchema>,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self> {
        scaler.validate()?;
        if scaler.n_features() != schema.len() {
            return Err(CureError::InvalidInput(format!(
                "scaler was fitted on {} features but the feature list has {}",
                scaler.n_features(),
                schema.len()
            )));
        }
        if let Some(names) = &scaler.feature_names {
            if names.as_slice() != schema.names() {
                return Err(CureError::FeatureMismatch {
                    expected: schema.names().to_vec(),
                    found: names.clone(),
                });
            }
        }
        if classifier.n_features() != schema.len() {
            return Err(CureError::InvalidInput(format!(
                "classifier expects {} features but the feature list has {}",
                classifier.n_features(),
                schema.len()
            )));
        }
        Ok(Self { schema, scaler, classifier })
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    /// Reconcile against this model's own schema.
    pub fn reconcile(&self, partial: &PartialVector) -> ReconciledVector {
        reconcile(partial, &self.schema)
    }

    /// Scale and classify a reconciled vector.
    ///
    /// The vector must have been reconciled against this model's schema;
    /// anything else is a feature mismatch, since the scaler has no notion of
    /// column identity.
    pub fn predict(&self, vector: &ReconciledVector) -> Result<Prediction> {
        let same_schema = Arc::ptr_eq(vector.schema(), &self.schema)
            || vector.schema().as_ref() == self.schema.as_ref();
        if !same_schema || vector.len() != self.schema.len() {
            return Err(CureError::FeatureMismatch {
                expected: self.schema.names().to_vec(),
                found: vector.schema().names().to_vec(),
            });
        }

        let scaled = self.scaler.transform(vector.values())?;
        let prediction = Prediction::from_probabilities(self.classifier.predict_proba(&scaled)?)?;
        debug_assert!(
            (prediction.probability_benign + prediction.probability_malignant - 1.0).abs()
                < PROBABILITY_TOLERANCE
        );

        tracing::info!(
            classifier = self.classifier.name(),
            diagnosis = %prediction.diagnosis,
            p_benign = prediction.probability_benign,
            p_malignant = prediction.probability_malignant,
            zero_filled = vector.zero_filled().len(),
            "prediction complete"
        );
        Ok(prediction)
    }

    /// Full flow from caller inputs: reconcile, then predict.
    pub fn predict_partial(&self, partial: &PartialVector) -> Result<(ReconciledVector, Prediction)> {
        let vector = self.reconcile(partial);
        let prediction = self.predict(&vector)?;
        Ok((vector, prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticRegression;
    use crate::features::INPUT_CONTROLS;

    fn control_names() -> Vec<&'static str> {
        INPUT_CONTROLS.iter().map(|c| c.name).collect()
    }

    fn model_with(coefficients: Vec<f64>, intercept: f64) -> Model {
        let schema = Arc::new(FeatureSchema::new(control_names()).unwrap());
        let n = schema.len();
        let scaler = StandardScaler::new(vec![0.0; n], vec![1.0; n]);
        Model::new(schema, scaler, Box::new(LogisticRegression { coefficients, intercept })).unwrap()
    }

    #[test]
    fn test_probabilities_sum_to_one_across_inputs() {
        let model = model_with((0..12).map(|i| 0.05 * i as f64 - 0.2).collect(), -0.3);
        for step in 0..=20 {
            let t = step as f64 / 20.0;
            let partial = PartialVector::from_values(
                INPUT_CONTROLS.iter().map(|c| (c.name, c.min + (c.max - c.min) * t)),
            )
            .unwrap();
            let (_, p) = model.predict_partial(&partial).unwrap();
            assert!((p.probability_benign + p.probability_malignant - 1.0).abs() < PROBABILITY_TOLERANCE);
        }
    }

    #[test]
    fn test_label_agrees_with_probabilities() {
        let malignant = model_with(vec![0.0; 12], 3.0);
        let (_, p) = malignant.predict_partial(&PartialVector::defaults()).unwrap();
        assert_eq!(p.diagnosis, Diagnosis::Malignant);
        assert!(p.probability_malignant > 0.9);

        let benign = model_with(vec![0.0; 12], -3.0);
        let (_, p) = benign.predict_partial(&PartialVector::defaults()).unwrap();
        assert_eq!(p.diagnosis, Diagnosis::Benign);
        assert_eq!(p.probability_of(Diagnosis::Benign), p.probability_benign);
    }

    #[test]
    fn test_vector_from_other_schema_is_mismatch() {
        let model = model_with(vec![0.1; 12], 0.0);
        let mut reversed = control_names();
        reversed.reverse();
        let other = Arc::new(FeatureSchema::new(reversed).unwrap());
        let vector = reconcile(&PartialVector::defaults(), &other);
        let err = model.predict(&vector).unwrap_err();
        assert!(matches!(err, CureError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_equal_schema_in_separate_arc_is_accepted() {
        let model = model_with(vec![0.1; 12], 0.0);
        let twin = Arc::new(FeatureSchema::new(control_names()).unwrap());
        let vector = reconcile(&PartialVector::defaults(), &twin);
        assert!(model.predict(&vector).is_ok());
    }

    #[test]
    fn test_named_scaler_must_match_schema_order() {
        let schema = Arc::new(FeatureSchema::new(["radius_mean", "texture_mean"]).unwrap());
        let mut scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        scaler.feature_names = Some(vec!["texture_mean".into(), "radius_mean".into()]);
        let lr = LogisticRegression { coefficients: vec![1.0, 1.0], intercept: 0.0 };
        let err = Model::new(schema, scaler, Box::new(lr)).unwrap_err();
        assert!(matches!(err, CureError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_width_mismatch_rejected_at_assembly() {
        let schema = Arc::new(FeatureSchema::new(["radius_mean", "texture_mean"]).unwrap());
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]);
        let lr = LogisticRegression { coefficients: vec![1.0, 1.0, 1.0], intercept: 0.0 };
        assert!(Model::new(schema, scaler, Box::new(lr)).is_err());
    }

    #[test]
    fn test_from_probabilities_renormalises() {
        let p = Prediction::from_probabilities([0.2, 0.6]).unwrap();
        assert!((p.probability_benign - 0.25).abs() < 1e-12);
        assert!((p.probability_malignant - 0.75).abs() < 1e-12);
        assert!(Prediction::from_probabilities([f64::NAN, 0.5]).is_err());
        assert!(Prediction::from_probabilities([0.0, 0.0]).is_err());
    }
}
