//! Chat bot page: the configured assistant embedded in an iframe.

use axum::{extract::State, response::Html, Extension};
use curecanc_common::html::escape;

use crate::handlers::page_shell;
use crate::session::Session;
use crate::state::SharedState;

pub async fn chatbot_page(
    State(state): State<SharedState>,
    Extension(session): Extension<Session>,
) -> Html<String> {
    let chatbot = &state.config.chatbot;
    let body = format!(r#"
    <div class="page-header"><h1 class="page-title">Chat Bot</h1></div>
    <iframe class="chatbot-frame" src="{}" width="100%" height="{}" style="border: 2px solid #ccc; border-radius: 10px;"></iframe>"#,
        escape(&chatbot.iframe_url), chatbot.height);
    Html(page_shell("Chat Bot", Some(&session), &body))
}
