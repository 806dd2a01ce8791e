//! JSON API: health, feature catalogue, prediction, report download and
//! model reload.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};
use curecanc_common::{ApiError, CureError, Result};
use curecanc_model::{
    find_control, Diagnosis, FeatureControl, PartialVector, ReconciledVector, StoreStatus,
    INPUT_CONTROLS,
};
use serde::Serialize;
use serde_json::Value;

use crate::diagnosis::diagnose;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub features: usize,
}

pub async fn api_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = state.models.status().await;
    Json(HealthResponse {
        status: "ok",
        model_loaded: status.model_loaded,
        features: status.features.len(),
    })
}

#[derive(Serialize)]
pub struct FeaturesResponse {
    pub controls: &'static [FeatureControl],
    pub schema: Vec<String>,
}

pub async fn api_features(State(state): State<SharedState>) -> Json<FeaturesResponse> {
    let status = state.models.status().await;
    Json(FeaturesResponse { controls: &INPUT_CONTROLS, schema: status.features })
}

/// Body of `/api/predict` and `/api/report`: control name → number.
///
/// Missing controls take their default and unknown keys are ignored; a
/// known control with a non-numeric value is rejected.
pub fn parse_inputs(body: &BTreeMap<String, Value>) -> Result<PartialVector> {
    let mut values = Vec::with_capacity(body.len());
    for (key, value) in body {
        if find_control(key).is_none() {
            continue;
        }
        let number = value
            .as_f64()
            .ok_or_else(|| CureError::InvalidInput(format!("{key} must be a number, got {value}")))?;
        values.push((key.as_str(), number));
    }
    PartialVector::from_values(values)
}

#[derive(Serialize)]
pub struct ReportPayload {
    pub filename: String,
    pub base64: String,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub diagnosis: Diagnosis,
    pub probability_benign: f64,
    pub probability_malignant: f64,
    pub zero_filled: Vec<String>,
    pub features: ReconciledVector,
    pub chart_svg: String,
    pub report: ReportPayload,
}

pub async fn api_predict(
    State(state): State<SharedState>,
    Json(body): Json<BTreeMap<String, Value>>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let partial = parse_inputs(&body)?;
    let outcome = diagnose(&state, &partial).await?;
    let report = ReportPayload {
        filename: outcome.report.filename.clone(),
        base64: outcome.report.base64(),
    };
    Ok(Json(PredictResponse {
        diagnosis: outcome.prediction.diagnosis,
        probability_benign: outcome.prediction.probability_benign,
        probability_malignant: outcome.prediction.probability_malignant,
        zero_filled: outcome.vector.zero_filled().to_vec(),
        features: outcome.vector,
        chart_svg: outcome.chart_svg,
        report,
    }))
}

pub async fn api_report(
    State(state): State<SharedState>,
    Json(body): Json<BTreeMap<String, Value>>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let partial = parse_inputs(&body)?;
    let outcome = diagnose(&state, &partial).await?;
    let disposition = format!(r#"attachment; filename="{}""#, outcome.report.filename.replace('"', ""));
    Ok((
        [(CONTENT_TYPE, "application/pdf".to_string()), (CONTENT_DISPOSITION, disposition)],
        outcome.report.pdf,
    ))
}

pub async fn api_reload(
    State(state): State<SharedState>,
) -> std::result::Result<Json<StoreStatus>, ApiError> {
    state.models.reload().await?;
    Ok(Json(state.models.status().await))
}
