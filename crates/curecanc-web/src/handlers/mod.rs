//! HTTP handlers for all web routes, plus the shared page shell.

pub mod account;
pub mod api;
pub mod chatbot;
pub mod dashboard;
pub mod pages;

use curecanc_common::html::escape;

use crate::session::Session;

/// Sidebar shown to signed-in users.
pub const NAV_HTML: &str = include_str!("../../templates/nav.html");
/// Sidebar shown without a session: Account only, plus the sign-in warning.
pub const GUEST_NAV_HTML: &str = include_str!("../../templates/nav_guest.html");

/// Wrap a page body in the document, sidebar and user badge.
pub fn page_shell(title: &str, session: Option<&Session>, body: &str) -> String {
    let (nav, badge) = match session {
        Some(s) => (
            NAV_HTML,
            format!(r#"<div class="user-badge">Signed in as <strong>{}</strong></div>"#, escape(&s.name)),
        ),
        None => (GUEST_NAV_HTML, String::new()),
    };
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} — CureCancAI</title>
    <link rel="stylesheet" href="/static/css/main.css?v=0.1.0">
</head>
<body>
<div class="app-container">
{}
<main class="main-content">
{}
{}
</main>
</div>
</body>
</html>"#, escape(title), nav, badge, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_guest_shell_shows_only_account() {
        let html = page_shell("Account", None, "<p>body</p>");
        assert!(html.contains("Please login or sign up to access the app."));
        assert!(html.contains(r#"href="/account""#));
        assert!(!html.contains(r#"href="/dashboard""#));
        assert!(html.contains("Made by ByteForce"));
    }

    #[test]
    fn test_signed_in_shell_has_full_nav() {
        let session = Session { name: "<Ada>".into(), started_at: Utc::now() };
        let html = page_shell("Home", Some(&session), "");
        for link in ["/account", "/", "/dashboard", "/chatbot", "/blogs", "/faqs"] {
            assert!(html.contains(&format!(r#"href="{link}""#)), "{link}");
        }
        assert!(html.contains("&lt;Ada&gt;"));
        assert!(!html.contains("Please login"));
    }
}
