//! PDF rendering with `lopdf`.
//!
//! The document uses the three standard Helvetica faces (no embedding) and
//! is written straight into a byte buffer.

use curecanc_common::{CureError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::document::{
    ReportDocument, DISCLAIMER, INPUT_FEATURE_SUMMARY, INTRODUCTION, MEDICAL_RECOMMENDATION,
    PATIENT_ID_LINE, PATIENT_NAME_LINE, PREDICTION_SUMMARY, TITLE,
};
use crate::layout::{Cell, FontStyle, Layout, PAGE_HEIGHT, PAGE_WIDTH, PT_PER_MM};

const FEATURE_COLUMN: f64 = 90.0;
const VALUE_COLUMN: f64 = 50.0;

/// Lay out the report sections in order.
pub fn layout_report(doc: &ReportDocument) -> Layout {
    let mut page = Layout::new();

    page.set_font(FontStyle::Bold, 20.0);
    page.cell(Cell::line(15.0, TITLE).centered());

    page.set_font(FontStyle::Regular, 12.0);
    page.cell(Cell::line(10.0, &doc.date_line()));
    page.cell(Cell::line(10.0, PATIENT_NAME_LINE));
    page.cell(Cell::line(10.0, PATIENT_ID_LINE));

    page.ln(5.0);
    page.set_font(FontStyle::Regular, 11.0);
    page.paragraph(7.0, INTRODUCTION);

    page.ln(5.0);
    page.set_font(FontStyle::Bold, 13.0);
    page.cell(Cell::line(10.0, PREDICTION_SUMMARY));
    page.set_font(FontStyle::Regular, 12.0);
    page.cell(Cell::line(10.0, &doc.result_line()));
    page.cell(Cell::line(10.0, &doc.benign_line()));
    page.cell(Cell::line(10.0, &doc.malignant_line()));

    page.ln(5.0);
    page.set_font(FontStyle::Bold, 13.0);
    page.cell(Cell::line(10.0, MEDICAL_RECOMMENDATION));
    page.set_font(FontStyle::Regular, 11.0);
    page.paragraph(7.0, doc.recommendation());

    page.ln(5.0);
    page.set_font(FontStyle::Bold, 13.0);
    page.cell(Cell::line(10.0, INPUT_FEATURE_SUMMARY));
    page.set_font(FontStyle::Bold, 11.0);
    page.cell(Cell::boxed(FEATURE_COLUMN, 8.0, "Feature"));
    page.cell(Cell::boxed(VALUE_COLUMN, 8.0, "Value").end_line());

    page.set_font(FontStyle::Regular, 11.0);
    for row in &doc.rows {
        page.cell(Cell::boxed(FEATURE_COLUMN, 8.0, &row.feature));
        page.cell(Cell::boxed(VALUE_COLUMN, 8.0, &row.value).end_line());
    }

    page.ln(10.0);
    page.set_font(FontStyle::Italic, 10.0);
    page.paragraph(5.0, DISCLAIMER);

    page
}

fn pdf_error(e: lopdf::Error) -> CureError {
    CureError::Report(e.to_string())
}

/// Render the report to PDF bytes.
pub fn render_pdf(doc: &ReportDocument) -> Result<Vec<u8>> {
    let pages = layout_report(doc).into_pages();
    let bytes = write_pages(pages)?;
    debug!(bytes = bytes.len(), diagnosis = %doc.diagnosis, "report rendered");
    Ok(bytes)
}

fn write_pages(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
    let mut pdf = Document::with_version("1.4");
    let pages_id = pdf.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for style in FontStyle::ALL {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => style.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(style.resource_name(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }.encode().map_err(pdf_error)?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real((PAGE_WIDTH * PT_PER_MM) as _),
        Object::Real((PAGE_HEIGHT * PT_PER_MM) as _),
    ];
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer).map_err(|e| CureError::Report(format!("writing PDF: {e}")))?;
    Ok(buffer)
}
