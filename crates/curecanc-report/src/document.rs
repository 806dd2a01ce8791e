//! Report content: the fixed texts and the values taken from one prediction.

use chrono::NaiveDate;
use curecanc_model::{Diagnosis, Prediction, ReconciledVector};
use serde::Serialize;

pub const TITLE: &str = "Breast Cancer Diagnostic Report";

pub const PATIENT_NAME_LINE: &str = "Patient Name: _______________________________";
pub const PATIENT_ID_LINE: &str = "Patient ID: _________________________________";

pub const INTRODUCTION: &str = "This report presents the results of a machine learning-based \
diagnostic evaluation. The input data provided was analyzed using a trained classifier to assist \
in determining the likelihood of a tumor being malignant or benign. This tool is intended to \
support, not replace, clinical judgement.";

pub const PREDICTION_SUMMARY: &str = "Prediction Summary";
pub const MEDICAL_RECOMMENDATION: &str = "Medical Recommendation";
pub const INPUT_FEATURE_SUMMARY: &str = "Input Feature Summary";

pub const MALIGNANT_RECOMMENDATION: &str = "The model predicts that the tumor is likely malignant. \
It is strongly recommended that the patient consult an oncologist or a medical professional \
immediately for confirmatory testing such as a biopsy, MRI, or further clinical evaluation.";

pub const BENIGN_RECOMMENDATION: &str = "The model predicts that the tumor is likely benign. \
However, it is still recommended to follow up with a healthcare provider for further assessment \
and routine check-ups to rule out any anomalies.";

pub const DISCLAIMER: &str = "Disclaimer: This report is generated by an AI system and is not a \
substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of a \
qualified healthcare provider.";

/// `radius_mean` → `Radius mean`, `concave points_mean` → `Concave points mean`.
pub fn humanize_feature(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Round to four decimals and print with a trailing `.0` for whole numbers.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // -0.0 would print with a sign.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:?}")
}

/// Probability in `[0, 1]` as a percentage with two decimals.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub feature: String,
    pub value: String,
}

/// Everything the renderer prints, resolved to strings up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub date: NaiveDate,
    pub diagnosis: Diagnosis,
    pub probability_benign: f64,
    pub probability_malignant: f64,
    pub rows: Vec<FeatureRow>,
}

impl ReportDocument {
    /// Content for one prediction; the table lists every reconciled column,
    /// zero-filled ones included, in schema order.
    pub fn new(vector: &ReconciledVector, prediction: &Prediction, date: NaiveDate) -> Self {
        let rows = vector
            .iter()
            .map(|(name, value)| FeatureRow {
                feature: humanize_feature(name),
                value: format_value(value),
            })
            .collect();
        Self {
            date,
            diagnosis: prediction.diagnosis,
            probability_benign: prediction.probability_benign,
            probability_malignant: prediction.probability_malignant,
            rows,
        }
    }

    pub fn date_line(&self) -> String {
        format!("Date: {}", self.date.format("%B %d, %Y"))
    }

    pub fn status_text(&self) -> &'static str {
        match self.diagnosis {
            Diagnosis::Malignant => "High Risk - Malignant",
            Diagnosis::Benign => "Low Risk - Benign",
        }
    }

    pub fn result_line(&self) -> String {
        format!("Prediction Result: {}", self.status_text())
    }

    pub fn benign_line(&self) -> String {
        format!("Benign Probability: {}", format_percent(self.probability_benign))
    }

    pub fn malignant_line(&self) -> String {
        format!("Malignant Probability: {}", format_percent(self.probability_malignant))
    }

    pub fn recommendation(&self) -> &'static str {
        match self.diagnosis {
            Diagnosis::Malignant => MALIGNANT_RECOMMENDATION,
            Diagnosis::Benign => BENIGN_RECOMMENDATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curecanc_model::{reconcile, FeatureSchema, PartialVector};
    use std::sync::Arc;

    fn doc(p_malignant: f64) -> ReportDocument {
        let schema = Arc::new(FeatureSchema::new(["radius_mean", "concave points_mean", "extra_se"]).unwrap());
        let vector = reconcile(&PartialVector::defaults(), &schema);
        let prediction = Prediction::from_probabilities([1.0 - p_malignant, p_malignant]).unwrap();
        ReportDocument::new(&vector, &prediction, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap())
    }

    #[test]
    fn test_humanize_feature() {
        assert_eq!(humanize_feature("radius_mean"), "Radius mean");
        assert_eq!(humanize_feature("concave points_mean"), "Concave points mean");
        assert_eq!(humanize_feature("fractal_dimension_SE"), "Fractal dimension se");
        assert_eq!(humanize_feature(""), "");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(14.0), "14.0");
        assert_eq!(format_value(0.05), "0.05");
        assert_eq!(format_value(0.123456), "0.1235");
        assert_eq!(format_value(700.0), "700.0");
        assert_eq!(format_value(-0.00001), "0.0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.87654), "87.65%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_malignant_document() {
        let d = doc(0.75);
        assert_eq!(d.diagnosis, Diagnosis::Malignant);
        assert_eq!(d.result_line(), "Prediction Result: High Risk - Malignant");
        assert_eq!(d.benign_line(), "Benign Probability: 25.00%");
        assert_eq!(d.malignant_line(), "Malignant Probability: 75.00%");
        assert_eq!(d.recommendation(), MALIGNANT_RECOMMENDATION);
    }

    #[test]
    fn test_benign_document() {
        let d = doc(0.1);
        assert_eq!(d.result_line(), "Prediction Result: Low Risk - Benign");
        assert_eq!(d.recommendation(), BENIGN_RECOMMENDATION);
    }

    #[test]
    fn test_rows_follow_schema_and_include_zero_fill() {
        let d = doc(0.5);
        let rows: Vec<(&str, &str)> = d.rows.iter().map(|r| (r.feature.as_str(), r.value.as_str())).collect();
        assert_eq!(
            rows,
            vec![("Radius mean", "14.0"), ("Concave points mean", "0.2"), ("Extra se", "0.0")]
        );
    }

    #[test]
    fn test_date_line() {
        assert_eq!(doc(0.5).date_line(), "Date: March 07, 2025");
    }
}
