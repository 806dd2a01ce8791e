//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use curecanc_config::Config;
use curecanc_model::{ArtifactPaths, ModelStore};
use curecanc_test_utils::pretty_assertions::assert_eq;
use curecanc_test_utils::{
    constant_artifacts, constant_model, control_feature_names, wdbc_feature_names,
};
use curecanc_web::router::build_router;
use curecanc_web::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

const COOKIE_NAME: &str = "curecanc_session";

/// Router over `store`, plus a cookie for an already signed-in user.
async fn app(store: ModelStore) -> (Router, String) {
    let state = AppState::with_store(Config::default(), store);
    let token = state.sessions.create("Tester").await.unwrap();
    (build_router(state), format!("{COOKIE_NAME}={token}"))
}

async fn app_with_model(names: &[String], p_malignant: f64) -> (Router, String) {
    app(ModelStore::with_model(missing_paths(), constant_model(names, p_malignant))).await
}

/// Artifact paths in a directory that does not exist.
fn missing_paths() -> ArtifactPaths {
    ArtifactPaths::in_dir(std::env::temp_dir().join(format!("curecanc-missing-{}", uuid::Uuid::new_v4())))
}

/// Decode the `report.base64` field of a prediction response.
fn decode_pdf(body: &Value) -> Vec<u8> {
    let encoded = body["report"]["base64"].as_str().expect("base64 report");
    curecanc_report::decode(encoded).expect("valid base64")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(COOKIE, c);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(COOKIE, cookie)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app_with_model(&control_feature_names(), 0.5).await;
    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"status": "ok", "model_loaded": true, "features": 12}));
}

#[tokio::test]
async fn api_without_session_is_unauthorized() {
    let (app, _) = app_with_model(&control_feature_names(), 0.5).await;
    let response = app.oneshot(get("/api/features", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "session_required");
}

#[tokio::test]
async fn pages_without_session_redirect_to_account() {
    let (app, _) = app_with_model(&control_feature_names(), 0.5).await;
    for uri in ["/", "/dashboard", "/chatbot", "/blogs", "/faqs"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.headers()[LOCATION], "/account");
    }
    let response = app.clone().oneshot(get("/dashboard", Some("curecanc_session=forged"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn account_page_warns_guests() {
    let (app, _) = app_with_model(&control_feature_names(), 0.5).await;
    let html = body_text(app.oneshot(get("/account", None)).await.unwrap()).await;
    assert!(html.contains("Please login or sign up to access the app."));
    assert!(html.contains(r#"action="/account/login""#));
}

#[tokio::test]
async fn login_then_logout() {
    let (app, _) = app_with_model(&control_feature_names(), 0.5).await;

    let response = app.clone().oneshot(post_form("/account/login", None, "name=Grace")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie.starts_with("curecanc_session="));

    let home = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
    assert_eq!(home.status(), StatusCode::OK);
    let html = body_text(home).await;
    assert!(html.contains("Grace"));
    assert!(html.contains(r#"href="/dashboard""#));

    let response = app.clone().oneshot(post_form("/account/logout", Some(&cookie), "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers()[SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

    let after = app.oneshot(get("/", Some(&cookie))).await.unwrap();
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn blank_login_name_is_rejected() {
    let (app, _) = app_with_model(&control_feature_names(), 0.5).await;
    let response = app.oneshot(post_form("/account/login", None, "name=+++")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn dashboard_renders_twelve_sliders_without_prediction() {
    let (app, cookie) = app_with_model(&control_feature_names(), 0.5).await;
    let html = body_text(app.oneshot(get("/dashboard", Some(&cookie))).await.unwrap()).await;
    assert_eq!(html.matches(r#"type="range""#).count(), 12);
    assert!(html.contains(r#"name="concave_points_mean""#));
    assert!(!html.contains("The prediction is"));
}

#[tokio::test]
async fn dashboard_submit_renders_malignant_result() {
    let (app, cookie) = app_with_model(&wdbc_feature_names(), 0.9).await;
    let response = app
        .oneshot(post_form("/dashboard", Some(&cookie), "radius_mean=20.5&concave_points_mean=0.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("The prediction is: Malignant"));
    assert!(html.contains("Consult with a healthcare professional immediately."));
    assert!(html.contains(r#"value="20.5""#));
    assert!(html.contains(r#"value="0.4""#));
    assert!(html.contains("18 model feature(s) have no input control"));
    assert!(html.contains("<svg"));
    assert!(html.contains("data:application/octet-stream;base64,JVBER"));
    assert!(html.contains(r#"download="breast_cancer_report.pdf""#));
}

#[tokio::test]
async fn dashboard_submit_renders_benign_result() {
    let (app, cookie) = app_with_model(&control_feature_names(), 0.1).await;
    let html = body_text(app.oneshot(post_form("/dashboard", Some(&cookie), "")).await.unwrap()).await;
    assert!(html.contains("The prediction is: Benign"));
    assert!(html.contains("Still, regular monitoring and check-ups are advised."));
    assert!(!html.contains("have no input control"));
}

#[tokio::test]
async fn rejected_dashboard_form_keeps_valid_inputs() {
    let (app, cookie) = app_with_model(&control_feature_names(), 0.5).await;
    let response = app
        .oneshot(post_form("/dashboard", Some(&cookie), "radius_mean=22.5&area_mean=lots"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("Error 400"));
    assert!(html.contains(r#"value="22.5""#));
    assert!(html.contains("<output>22.5</output>"));
    assert!(html.contains("<output>700</output>"));
}

#[tokio::test]
async fn dashboard_rejects_non_numeric_input() {
    let (app, cookie) = app_with_model(&control_feature_names(), 0.5).await;
    let response = app
        .oneshot(post_form("/dashboard", Some(&cookie), "area_mean=lots"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Error 400"));
}

#[tokio::test]
async fn dashboard_reports_missing_model() {
    let (app, cookie) = app(ModelStore::new(missing_paths())).await;
    let response = app.oneshot(post_form("/dashboard", Some(&cookie), "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let html = body_text(response).await;
    assert!(html.contains("Error 503"));
    assert!(html.contains("Model unavailable"));
}

#[tokio::test]
async fn api_predict_returns_full_outcome() {
    let names = wdbc_feature_names();
    let (app, cookie) = app_with_model(&names, 0.25).await;
    let response = app
        .oneshot(post_json("/api/predict", &cookie, json!({"radius_mean": 40.0, "texture_mean": 12})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["diagnosis"], "benign");
    let (pb, pm) = (
        body["probability_benign"].as_f64().unwrap(),
        body["probability_malignant"].as_f64().unwrap(),
    );
    assert!((pb + pm - 1.0).abs() < 1e-9);
    assert_eq!(body["zero_filled"].as_array().unwrap().len(), 18);

    let features = body["features"].as_object().unwrap();
    assert_eq!(features.len(), 30);
    assert_eq!(features["radius_mean"], 30.0);
    assert_eq!(features["texture_mean"], 12.0);
    assert_eq!(features["area_worst"], 0.0);

    assert!(body["chart_svg"].as_str().unwrap().starts_with("<svg"));
    assert_eq!(body["report"]["filename"], "breast_cancer_report.pdf");
    assert!(decode_pdf(&body).starts_with(b"%PDF"));
}

#[tokio::test]
async fn api_predict_rejects_non_numeric_value() {
    let (app, cookie) = app_with_model(&control_feature_names(), 0.5).await;
    let response = app
        .oneshot(post_json("/api/predict", &cookie, json!({"radius_mean": "big"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_input");
}

#[tokio::test]
async fn api_report_streams_pdf_attachment() {
    let (app, cookie) = app_with_model(&control_feature_names(), 0.7).await;
    let response = app.oneshot(post_json("/api/report", &cookie, json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        r#"attachment; filename="breast_cancer_report.pdf""#
    );
    let bytes = body_bytes(response).await;
    let pdf = lopdf::Document::load_mem(&bytes).expect("valid PDF");
    assert!(!pdf.get_pages().is_empty());
}

#[tokio::test]
async fn api_features_lists_controls_and_schema() {
    let (app, cookie) = app_with_model(&wdbc_feature_names(), 0.5).await;
    let body = body_json(app.oneshot(get("/api/features", Some(&cookie))).await.unwrap()).await;
    let controls = body["controls"].as_array().unwrap();
    assert_eq!(controls.len(), 12);
    assert_eq!(controls[7]["name"], "concave points_mean");
    assert_eq!(controls[7]["field"], "concave_points_mean");
    assert_eq!(body["schema"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn reload_failure_keeps_serving_previous_model() {
    let names = control_feature_names();
    let artifacts = constant_artifacts(&names, 0.8);
    let store = ModelStore::open(artifacts.paths.clone()).await;
    let (app, cookie) = app(store).await;

    let ok = app.clone().oneshot(post_json("/api/model/reload", &cookie, json!({}))).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_json(ok).await["model_loaded"], true);

    artifacts.overwrite("scaler.json", b"{ broken");
    let failed = app.clone().oneshot(post_json("/api/model/reload", &cookie, json!({}))).await.unwrap();
    assert_eq!(failed.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(failed).await;
    assert_eq!(body["error"], "model_unavailable");
    assert!(body["message"].as_str().unwrap().contains("scaler"));

    let still = app.oneshot(post_json("/api/predict", &cookie, json!({}))).await.unwrap();
    assert_eq!(still.status(), StatusCode::OK);
    assert_eq!(body_json(still).await["diagnosis"], "malignant");
}

#[tokio::test]
async fn chatbot_embeds_configured_iframe() {
    let mut config = Config::default();
    config.chatbot.iframe_url = "https://chat.example.org/embed?id=1&lang=en".into();
    config.chatbot.height = 720;
    let store = ModelStore::with_model(missing_paths(), constant_model(&control_feature_names(), 0.5));
    let state = AppState::with_store(config, store);
    let token = state.sessions.create("Tester").await.unwrap();
    let app = build_router(state);

    let html = body_text(app.oneshot(get("/chatbot", Some(&format!("{COOKIE_NAME}={token}")))).await.unwrap()).await;
    assert!(html.contains(r#"src="https://chat.example.org/embed?id=1&amp;lang=en""#));
    assert!(html.contains(r#"height="720""#));
}
