//! Full flow from model output to a readable PDF.

use chrono::NaiveDate;
use curecanc_model::{Diagnosis, PartialVector};
use curecanc_report::{
    decode, generate_report, pie_chart_svg, BENIGN_RECOMMENDATION, DEFAULT_FILENAME, DISCLAIMER,
    MALIGNANT_RECOMMENDATION,
};
use curecanc_test_utils::pretty_assertions::assert_eq;
use curecanc_test_utils::{constant_model, control_feature_names, wdbc_feature_names};
use lopdf::content::Content;
use lopdf::{Document, Object};

/// All text drawn in the PDF, one entry per `Tj`, pages in order.
fn drawn_text(bytes: &[u8]) -> (usize, Vec<String>) {
    let pdf = Document::load_mem(bytes).expect("valid PDF");
    let pages = pdf.get_pages();
    let mut lines = Vec::new();
    for page_id in pages.values() {
        let raw = pdf.get_page_content(*page_id).expect("page content");
        let content = Content::decode(&raw).expect("content stream");
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(Object::String(text, _)) = op.operands.first() {
                lines.push(String::from_utf8_lossy(text).into_owned());
            }
        }
    }
    (pages.len(), lines)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[test]
fn malignant_report_reads_back_in_section_order() {
    let model = constant_model(&control_feature_names(), 0.87654);
    let (vector, prediction) = model.predict_partial(&PartialVector::defaults()).unwrap();
    assert_eq!(prediction.diagnosis, Diagnosis::Malignant);

    let report = generate_report(&vector, &prediction, date(), DEFAULT_FILENAME).unwrap();
    let (_, lines) = drawn_text(&report.pdf);

    assert_eq!(lines[0], "Breast Cancer Diagnostic Report");
    assert_eq!(lines[1], "Date: October 18, 2026");
    let text = lines.join(" ");

    let order = [
        "Prediction Summary",
        "Prediction Result: High Risk - Malignant",
        "Benign Probability: 12.35%",
        "Malignant Probability: 87.65%",
        "Medical Recommendation",
        MALIGNANT_RECOMMENDATION,
        "Input Feature Summary",
        "Feature Value",
        "Radius mean 14.0",
        "Concave points mean 0.2",
        "Texture se 1.0",
        DISCLAIMER,
    ];
    let mut cursor = 0;
    for needle in order {
        let found = text[cursor..].find(needle).unwrap_or_else(|| panic!("missing {needle:?}"));
        cursor += found + needle.len();
    }
    assert!(!text.contains(BENIGN_RECOMMENDATION));
}

#[test]
fn benign_report_carries_only_follow_up_text() {
    let model = constant_model(&control_feature_names(), 0.2);
    let (vector, prediction) = model.predict_partial(&PartialVector::defaults()).unwrap();
    let report = generate_report(&vector, &prediction, date(), DEFAULT_FILENAME).unwrap();
    let text = drawn_text(&report.pdf).1.join(" ");

    assert!(text.contains("Prediction Result: Low Risk - Benign"));
    assert!(text.contains(BENIGN_RECOMMENDATION));
    assert!(!text.contains(MALIGNANT_RECOMMENDATION));
}

#[test]
fn thirty_feature_report_spans_pages_and_lists_zero_fill() {
    let model = constant_model(&wdbc_feature_names(), 0.6);
    let (vector, prediction) = model.predict_partial(&PartialVector::defaults()).unwrap();
    let report = generate_report(&vector, &prediction, date(), "custom.pdf").unwrap();
    let (pages, lines) = drawn_text(&report.pdf);

    assert!(pages >= 2);
    let feature_cells: Vec<&String> = lines
        .iter()
        .skip_while(|l| l.as_str() != "Value")
        .skip(1)
        .step_by(2)
        .take(30)
        .collect();
    assert_eq!(feature_cells.len(), 30);
    assert_eq!(feature_cells[0], "Radius mean");
    assert_eq!(feature_cells[29], "Fractal dimension worst");
    assert!(lines.iter().any(|l| l == "Area worst"));
    assert!(lines.join(" ").contains("Area worst 0.0"));
}

#[test]
fn delivered_payload_decodes_to_the_same_pdf() {
    let model = constant_model(&control_feature_names(), 0.4);
    let (vector, prediction) = model.predict_partial(&PartialVector::defaults()).unwrap();
    let report = generate_report(&vector, &prediction, date(), DEFAULT_FILENAME).unwrap();

    assert_eq!(decode(&report.base64()).unwrap(), report.pdf);
    assert!(report.data_uri().starts_with("data:application/octet-stream;base64,JVBER"));
    let button = report.download_button_html();
    assert!(button.contains(&report.base64()));
    assert!(button.contains(r#"download="breast_cancer_report.pdf""#));

    let svg = pie_chart_svg(&prediction);
    assert!(svg.contains(">60.0%<"));
    assert!(svg.contains(">40.0%<"));
}
