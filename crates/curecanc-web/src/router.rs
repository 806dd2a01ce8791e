//! Route table: public account pages, the session-gated app and the JSON API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    account::{account_page, login, logout},
    api::{api_features, api_health, api_predict, api_reload, api_report},
    chatbot::chatbot_page,
    dashboard::{dashboard_page, dashboard_submit},
    pages::{blogs_page, faqs_page, home_page},
};
use crate::session::require_session;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);
    let static_dir = shared.config.server.static_dir.clone();

    // Everything here needs a session
    let gated = Router::new()
        .route("/",          get(home_page))
        .route("/dashboard", get(dashboard_page).post(dashboard_submit))
        .route("/chatbot",   get(chatbot_page))
        .route("/blogs",     get(blogs_page))
        .route("/faqs",      get(faqs_page))

        .route("/api/features",     get(api_features))
        .route("/api/predict",      post(api_predict))
        .route("/api/report",       post(api_report))
        .route("/api/model/reload", post(api_reload))
        .route_layer(middleware::from_fn_with_state(shared.clone(), require_session));

    Router::new()
        .route("/account",        get(account_page))
        .route("/account/login",  post(login))
        .route("/account/logout", post(logout))
        .route("/api/health",     get(api_health))
        .merge(gated)

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
