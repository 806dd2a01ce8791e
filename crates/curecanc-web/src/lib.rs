//! curecanc-web: Web GUI and JSON API for CureCancAI
//! Provides:
//!   - Breast cancer detection dashboard with PDF report download
//!   - Account page and session gate
//!   - Chat bot, blog and FAQ pages
//!   - JSON prediction/report API and model reload

pub mod diagnosis;
pub mod handlers;
pub mod router;
pub mod session;
pub mod state;
