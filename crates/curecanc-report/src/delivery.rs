//! Delivery encoding: base64 payload, data URI and the download button.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use curecanc_common::html::escape;
use curecanc_common::{CureError, Result};

pub const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";
pub const DEFAULT_FILENAME: &str = "breast_cancer_report.pdf";

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| CureError::InvalidInput(format!("invalid base64 payload: {e}")))
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("{DATA_URI_PREFIX}{}", encode(bytes))
}

/// Anchor styled as a green button that saves `bytes` as `filename`.
pub fn download_button_html(bytes: &[u8], filename: &str) -> String {
    format!(
        r#"<div class="download-row">
    <a class="btn-download" href="{}" download="{}">&#128196; Download Diagnostic Report</a>
</div>"#,
        data_uri(bytes),
        escape(filename)
    )
}
