// ── Runtime client configuration ──
//
// Describes *where* the controller lives and how long a request may take.
// Never touches disk; `hermie-config` or the embedding host builds one
// and hands it in.

use std::time::Duration;

use hermie_api::DEFAULT_TIMEOUT;

/// Origin used until the host or a profile supplies one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Everything needed to construct a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Network origin for all requests, already normalized.
    pub base_url: String,
    /// Hard per-request deadline.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Config for `base_url`, falling back to the default origin when the
    /// input normalizes to nothing.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Trim whitespace and strip one trailing slash.
///
/// Returns `None` when nothing is left, which callers treat as "keep the
/// previous base".
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_owned())
    }
}
