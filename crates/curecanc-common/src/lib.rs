//! curecanc-common: Shared error types and small helpers used across all
//! CureCancAI crates.

pub mod error;
pub mod html;

pub use error::{ApiError, CureError, Result};
