//! curecanc-report: Diagnostic report generation.
//!
//! Turns a reconciled feature vector and its prediction into:
//!   - a paginated PDF document (in memory)
//!   - a probability pie chart (SVG)
//!   - a base64 data URI wrapped in a download button

pub mod chart;
pub mod delivery;
pub mod document;
pub mod layout;
pub mod pdf;

use chrono::NaiveDate;
use curecanc_common::Result;
use curecanc_model::{Prediction, ReconciledVector};
use serde::Serialize;

pub use chart::pie_chart_svg;
pub use delivery::{data_uri, decode, download_button_html, encode, DEFAULT_FILENAME};
pub use document::{ReportDocument, BENIGN_RECOMMENDATION, DISCLAIMER, MALIGNANT_RECOMMENDATION};
pub use pdf::render_pdf;

/// A rendered report ready to hand to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ReportArtifact {
    #[serde(skip)]
    pub pdf: Vec<u8>,
    pub filename: String,
}

impl ReportArtifact {
    pub fn base64(&self) -> String {
        encode(&self.pdf)
    }

    pub fn data_uri(&self) -> String {
        data_uri(&self.pdf)
    }

    pub fn download_button_html(&self) -> String {
        download_button_html(&self.pdf, &self.filename)
    }
}

/// Build the document for one prediction and render it.
///
/// A rendering failure aborts here; nothing partial is returned.
pub fn generate_report(
    vector: &ReconciledVector,
    prediction: &Prediction,
    date: NaiveDate,
    filename: &str,
) -> Result<ReportArtifact> {
    let document = ReportDocument::new(vector, prediction, date);
    let pdf = render_pdf(&document)?;
    tracing::info!(
        diagnosis = %prediction.diagnosis,
        rows = document.rows.len(),
        bytes = pdf.len(),
        "diagnostic report generated"
    );
    Ok(ReportArtifact { pdf, filename: filename.to_string() })
}
