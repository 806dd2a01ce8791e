//! Breast cancer detection dashboard: input sliders, prediction, chart and
//! report download.

use axum::{extract::State, http::StatusCode, response::Html, Extension, Form};
use curecanc_common::html::escape;
use curecanc_common::CureError;
use curecanc_model::{Diagnosis, PartialVector, INPUT_CONTROLS};

use crate::diagnosis::{diagnose, Outcome};
use crate::handlers::page_shell;
use crate::session::Session;
use crate::state::SharedState;

pub async fn dashboard_page(Extension(session): Extension<Session>) -> Html<String> {
    Html(render_dashboard(&session, &PartialVector::defaults(), None))
}

pub async fn dashboard_submit(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
    Form(fields): Form<Vec<(String, String)>>,
) -> (StatusCode, Html<String>) {
    let pairs = || fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let partial = match PartialVector::from_form(pairs()) {
        Ok(p) => p,
        Err(e) => {
            let echoed = PartialVector::from_form_lossy(pairs());
            let html = render_dashboard(&session, &echoed, Some(Err(&e)));
            return (e.status_code(), Html(html));
        }
    };

    match diagnose(&state, &partial).await {
        Ok(outcome) => (StatusCode::OK, Html(render_dashboard(&session, &partial, Some(Ok(&outcome))))),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "dashboard prediction failed: {e}");
            (e.status_code(), Html(render_dashboard(&session, &partial, Some(Err(&e)))))
        }
    }
}

fn render_sliders(values: &PartialVector) -> String {
    INPUT_CONTROLS
        .iter()
        .map(|c| {
            let value = values.get(c.name).unwrap_or(c.default);
            format!(r#"
            <div class="slider-row">
                <label for="{field}">{label}</label>
                <input type="range" id="{field}" name="{field}" min="{min}" max="{max}" step="{step}" value="{value}"
                       oninput="this.nextElementSibling.value = this.value">
                <output>{value}</output>
            </div>"#,
                field = c.field, label = c.label, min = c.min, max = c.max, step = c.step, value = value)
        })
        .collect()
}

fn render_outcome(outcome: &Outcome) -> String {
    let label = outcome.prediction.diagnosis;
    let (colour, panel, description, advice) = match label {
        Diagnosis::Malignant => (
            "red",
            "result-malignant",
            "The model predicts that the tumor is <strong>malignant</strong>. Malignant tumors are cancerous and can spread.",
            "Consult with a healthcare professional immediately.",
        ),
        Diagnosis::Benign => (
            "green",
            "result-benign",
            "The model predicts that the tumor is <strong>benign</strong>. Benign tumors are usually non-cancerous.",
            "Still, regular monitoring and check-ups are advised.",
        ),
    };

    let zero_filled = outcome.vector.zero_filled();
    let notice = if zero_filled.is_empty() {
        String::new()
    } else {
        format!(r#"
        <div class="alert alert-warning">
            {} model feature(s) have no input control and were set to 0.0, which may bias the prediction:
            <span class="text-muted">{}</span>
        </div>"#, zero_filled.len(), escape(&zero_filled.join(", ")))
    };

    format!(r#"
    <h2 style="color: {colour};">The prediction is: {label}</h2>
    <div class="result-panel {panel}">
        <p><strong>Description:</strong> {description}</p>
        <p>{advice}</p>
    </div>
    {notice}
    <div class="chart">{chart}</div>
    {button}"#,
        chart = outcome.chart_svg,
        button = outcome.report.download_button_html())
}

fn render_error(err: &CureError) -> String {
    format!(r#"
    <div class="alert alert-danger">
        <strong>Error {}</strong> {}
    </div>"#, err.status_code().as_u16(), escape(&err.to_string()))
}

fn render_dashboard(
    session: &Session,
    values: &PartialVector,
    result: Option<Result<&Outcome, &CureError>>,
) -> String {
    let result_html = match result {
        None => r#"<p class="text-muted">Adjust the measurements and press Predict.</p>"#.to_string(),
        Some(Ok(outcome)) => render_outcome(outcome),
        Some(Err(e)) => render_error(e),
    };

    let body = format!(r#"
    <div class="page-header">
        <h1 class="page-title">&#129658; Breast Cancer Detection Dashboard</h1>
    </div>
    <div class="dashboard-grid">
        <form method="post" action="/dashboard" class="card">
            <h3>Input Features</h3>
            {}
            <button type="submit" class="btn btn-primary">Predict</button>
        </form>
        <section class="card">
            {}
        </section>
    </div>"#, render_sliders(values), result_html);

    page_shell("Dashboard", Some(session), &body)
}
