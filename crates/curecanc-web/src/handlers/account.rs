//! Account page: sign in with a display name, sign out.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use curecanc_common::html::escape;
use serde::Deserialize;

use crate::handlers::page_shell;
use crate::session::{current_session, login_cookie, logout_cookie, session_token, Session};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
}

pub async fn account_page(State(state): State<SharedState>, headers: HeaderMap) -> Html<String> {
    let session = current_session(&state, &headers).await;
    Html(render_account(session.as_ref(), None))
}

pub async fn login(State(state): State<SharedState>, Form(form): Form<LoginForm>) -> Response {
    match state.sessions.create(&form.name).await {
        Ok(token) => {
            let cookie = login_cookie(&state.config.session.cookie_name, &token);
            ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, Html(render_account(None, Some(&e.to_string())))).into_response(),
    }
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.session.cookie_name;
    if let Some(token) = session_token(&headers, cookie_name) {
        state.sessions.remove(&token).await;
    }
    ([(SET_COOKIE, logout_cookie(cookie_name))], Redirect::to("/account")).into_response()
}

fn render_account(session: Option<&Session>, error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<div class="alert alert-danger">{}</div>"#, escape(e)))
        .unwrap_or_default();

    let body = match session {
        Some(s) => format!(r#"
    <div class="page-header"><h1 class="page-title">Account</h1></div>
    <div class="card">
        <p>You are signed in as <strong>{}</strong> since {}.</p>
        <form method="post" action="/account/logout">
            <button type="submit" class="btn btn-outline">Log out</button>
        </form>
    </div>"#, escape(&s.name), s.started_at.format("%Y-%m-%d %H:%M UTC")),
        None => format!(r#"
    <div class="page-header"><h1 class="page-title">Account</h1></div>
    {error_html}
    <div class="card">
        <form method="post" action="/account/login">
            <label for="name">Display name</label>
            <input type="text" id="name" name="name" maxlength="64" required>
            <button type="submit" class="btn btn-primary">Login / Sign up</button>
        </form>
    </div>"#),
    };

    page_shell("Account", session, &body)
}
