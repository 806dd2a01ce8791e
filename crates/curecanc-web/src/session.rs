//! Login sessions: an in-memory table keyed by an opaque cookie token, and
//! the middleware that gates every non-public route on it.

use std::collections::{HashMap, VecDeque};

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::headers::{Cookie, HeaderMapExt};
use chrono::{DateTime, Utc};
use curecanc_common::{ApiError, CureError, Result};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::state::SharedState;

/// Longest display name accepted at login.
pub const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub name: String,
    pub started_at: DateTime<Utc>,
}

/// Live sessions kept when no capacity is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug, Default)]
struct Table {
    sessions: HashMap<String, Session>,
    /// Tokens in creation order, oldest first.
    order: VecDeque<String>,
}

/// Bounded session table. Once full, starting a session evicts the oldest.
#[derive(Debug)]
pub struct SessionStore {
    table: RwLock<Table>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_sessions: usize) -> Self {
        Self { table: RwLock::new(Table::default()), max_sessions: max_sessions.max(1) }
    }

    /// Start a session for `name` and return its token.
    pub async fn create(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CureError::InvalidInput("display name must not be empty".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CureError::InvalidInput(format!(
                "display name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        let token = Uuid::new_v4().simple().to_string();
        let session = Session { name: name.to_string(), started_at: Utc::now() };

        let mut table = self.table.write().await;
        while table.sessions.len() >= self.max_sessions {
            let Some(oldest) = table.order.pop_front() else { break };
            if let Some(evicted) = table.sessions.remove(&oldest) {
                tracing::debug!(user = %evicted.name, "session evicted, table full");
            }
        }
        table.sessions.insert(token.clone(), session);
        table.order.push_back(token.clone());
        tracing::info!(user = name, live = table.sessions.len(), "session started");
        Ok(token)
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.table.read().await.sessions.get(token).cloned()
    }

    pub async fn remove(&self, token: &str) -> Option<Session> {
        let mut table = self.table.write().await;
        let removed = table.sessions.remove(token);
        if let Some(session) = &removed {
            table.order.retain(|t| t != token);
            tracing::info!(user = %session.name, "session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.sessions.len()
    }
}

/// The session token carried in the request's cookies, if any.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(cookie_name).map(str::to_string))
        .filter(|token| !token.is_empty())
}

/// Resolve the request's session against the store.
pub async fn current_session(state: &SharedState, headers: &HeaderMap) -> Option<Session> {
    let token = session_token(headers, &state.config.session.cookie_name)?;
    state.sessions.get(&token).await
}

pub fn login_cookie(cookie_name: &str, token: &str) -> String {
    format!("{cookie_name}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn logout_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Gate for everything except the account pages, static files and health.
///
/// Pages without a session redirect to `/account`; API calls get 401.
pub async fn require_session(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    match current_session(&state, request.headers()).await {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None if request.uri().path().starts_with("/api/") => {
            tracing::debug!(path = %request.uri().path(), "API call without session");
            ApiError(CureError::SessionRequired).into_response()
        }
        None => Redirect::to("/account").into_response(),
    }
}
