use reqwest::StatusCode;
use thiserror::Error;

/// Shown in place of a reply whenever a turn fails. Never includes error detail.
pub const APOLOGY: &str = "Sorry — something went wrong. Please try again later.";

/// Why a single chat turn failed.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("worker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("worker returned status {0}")]
    Status(StatusCode),

    /// The body was not JSON at all.
    #[error("worker response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("worker task ended before replying: {0}")]
    Aborted(String),
}

impl ChatError {
    /// Text safe to show the user for any failure.
    pub fn user_message(&self) -> &'static str {
        APOLOGY
    }
}
