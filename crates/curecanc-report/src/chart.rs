//! Probability pie chart as inline SVG.
//!
//! Wedges start at 12 o'clock and run counter-clockwise, benign first.

use std::f64::consts::PI;
use std::fmt::Write;

use curecanc_model::{Diagnosis, Prediction};

pub const BENIGN_COLOUR: &str = "#8fbc8f";
pub const MALIGNANT_COLOUR: &str = "#f08080";

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 340.0;
const CX: f64 = 200.0;
const CY: f64 = 170.0;
const RADIUS: f64 = 120.0;
/// Percentage labels sit at this fraction of the radius.
const PCT_DISTANCE: f64 = 0.6;
/// Category labels sit just outside the wedge.
const LABEL_DISTANCE: f64 = 1.1;

/// Wedge label in one decimal, e.g. `87.7%`.
pub fn percent_label(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn point(angle_deg: f64, distance: f64) -> (f64, f64) {
    let theta = angle_deg * PI / 180.0;
    (CX + distance * theta.cos(), CY - distance * theta.sin())
}

fn colour(diagnosis: Diagnosis) -> &'static str {
    match diagnosis {
        Diagnosis::Benign => BENIGN_COLOUR,
        Diagnosis::Malignant => MALIGNANT_COLOUR,
    }
}

pub fn pie_chart_svg(prediction: &Prediction) -> String {
    let mut wedges = String::new();
    let mut labels = String::new();
    let mut start = 90.0_f64;

    for diagnosis in [Diagnosis::Benign, Diagnosis::Malignant] {
        let p = prediction.probability_of(diagnosis);
        let sweep = 360.0 * p;
        let end = start + sweep;
        let fill = colour(diagnosis);

        let (x0, y0) = point(start, RADIUS);
        let (x1, y1) = point(end, RADIUS);
        let from = format!("{x0:.3} {y0:.3}");
        let to = format!("{x1:.3} {y1:.3}");
        // An arc whose rendered endpoints coincide is dropped by SVG renderers.
        let closes_on_itself = from == to;

        if p >= 1.0 || (closes_on_itself && sweep > 180.0) {
            let _ = write!(
                wedges,
                r#"<circle cx="{CX}" cy="{CY}" r="{RADIUS}" fill="{fill}" data-label="{}"/>"#,
                diagnosis.label()
            );
        } else if p > 0.0 && !closes_on_itself {
            let large_arc = u8::from(sweep > 180.0);
            // sweep-flag 0: counter-clockwise on screen.
            let _ = write!(
                wedges,
                r#"<path d="M {CX} {CY} L {from} A {RADIUS} {RADIUS} 0 {large_arc} 0 {to} Z" fill="{fill}" data-label="{}"/>"#,
                diagnosis.label()
            );
        }

        if p > 0.0 {
            let mid = start + sweep / 2.0;
            let (px, py) = point(mid, RADIUS * PCT_DISTANCE);
            let (lx, ly) = point(mid, RADIUS * LABEL_DISTANCE);
            let cos = (mid * PI / 180.0).cos();
            let anchor = if cos > 0.01 {
                "start"
            } else if cos < -0.01 {
                "end"
            } else {
                "middle"
            };
            let _ = write!(
                labels,
                r#"<text x="{px:.3}" y="{py:.3}" text-anchor="middle" dominant-baseline="middle">{}</text><text x="{lx:.3}" y="{ly:.3}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
                percent_label(p),
                diagnosis.label()
            );
        }

        start = end;
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" role="img" aria-label="Prediction probabilities" font-family="sans-serif" font-size="14">{wedges}{labels}</svg>"#
    )
}
