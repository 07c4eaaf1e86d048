use std::time::Duration;

use thiserror::Error;

/// Failure of a single bounded fetch.
///
/// The `Display` text is what the channels store in their error caches,
/// so HTTP failures render as the bare server-supplied message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The deadline fired before a response was fully read.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Network-level failure (connection refused, DNS, reset, etc.)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Response ────────────────────────────────────────────────────
    /// Non-success status. `message` is the body's `error` field when the
    /// server sent one, otherwise `HTTP {status}`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Success status but the body was not valid JSON.
    #[error("Invalid JSON response: {message}")]
    Decode { message: String, body: String },
}

impl Error {
    /// Returns `true` if the deadline expired.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
