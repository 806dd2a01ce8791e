//! Static content pages: home, blogs and FAQs.

use axum::{response::Html, Extension};

use crate::handlers::page_shell;
use crate::session::Session;

pub async fn home_page(Extension(session): Extension<Session>) -> Html<String> {
    let body = r#"
    <div class="page-header">
        <h1 class="page-title">CureCancAI</h1>
        <p class="text-muted">Machine-learning assistance for breast tumour assessment</p>
    </div>
    <div class="card">
        <p>CureCancAI estimates whether a breast tumour is benign or malignant from twelve
        cell-nucleus measurements taken from a fine-needle aspirate image.</p>
        <p>Open the <a href="/dashboard">Dashboard</a> to enter measurements, review the
        predicted class with its probabilities and download a diagnostic report. The
        <a href="/chatbot">Chat Bot</a> answers general questions about breast cancer.</p>
        <p class="text-muted">Results support, and never replace, clinical judgement.</p>
    </div>"#;
    Html(page_shell("Home", Some(&session), body))
}

pub async fn blogs_page(Extension(session): Extension<Session>) -> Html<String> {
    let body = r#"
    <div class="page-header"><h1 class="page-title">Blogs</h1></div>
    <article class="card">
        <h3>Reading a fine-needle aspirate</h3>
        <p>Each sample is described by the size, shape and texture of its cell nuclei:
        radius, texture, perimeter, area, smoothness, compactness, concavity, concave points,
        symmetry and fractal dimension, summarised by their mean and standard error.</p>
    </article>
    <article class="card">
        <h3>Benign or malignant?</h3>
        <p>Benign tumours are usually non-cancerous and do not spread. Malignant tumours are
        cancerous and can invade nearby tissue. Only a clinician can confirm either with
        tests such as a biopsy or an MRI.</p>
    </article>"#;
    Html(page_shell("Blogs", Some(&session), body))
}

pub async fn faqs_page(Extension(session): Extension<Session>) -> Html<String> {
    let body = r#"
    <div class="page-header"><h1 class="page-title">FAQs</h1></div>
    <div class="card">
        <h3>Is the prediction a diagnosis?</h3>
        <p>No. It is a statistical estimate and must be confirmed by a healthcare professional.</p>
        <h3>Why do some features show 0.0 in the report?</h3>
        <p>The model may use measurements the dashboard does not collect. Those are set to
        0.0 and listed under the prediction, since they can bias the result.</p>
        <h3>Is my report stored?</h3>
        <p>No. The report is generated in memory for each prediction and only handed to your browser.</p>
    </div>"#;
    Html(page_shell("FAQs", Some(&session), body))
}
