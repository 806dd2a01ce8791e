//! One diagnosis run: model lookup, prediction, report and chart.

use chrono::Local;
use curecanc_common::Result;
use curecanc_model::{PartialVector, Prediction, ReconciledVector};
use curecanc_report::{generate_report, pie_chart_svg, ReportArtifact};

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Outcome {
    pub vector: ReconciledVector,
    pub prediction: Prediction,
    pub report: ReportArtifact,
    pub chart_svg: String,
}

/// Run the full flow for one set of inputs.
///
/// Any failure (model unavailable, feature mismatch, rendering) aborts
/// before a report is handed out.
pub async fn diagnose(state: &AppState, partial: &PartialVector) -> Result<Outcome> {
    let model = state.models.current().await?;
    let (vector, prediction) = model.predict_partial(partial)?;
    let report = generate_report(
        &vector,
        &prediction,
        Local::now().date_naive(),
        &state.config.report.download_filename,
    )?;
    let chart_svg = pie_chart_svg(&prediction);
    Ok(Outcome { vector, prediction, report, chart_svg })
}
