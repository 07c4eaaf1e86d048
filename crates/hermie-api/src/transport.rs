// Shared transport configuration for building the fetcher's HTTP client.
//
// The request deadline lives here rather than on the reqwest builder: the
// fetcher enforces it with its own cancellable timer so that body reads
// and JSON parsing fall under the same bound.

use std::time::Duration;

use crate::error::Error;

/// Hard per-request deadline used by every channel.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("hermie/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Override the request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// The controller is a plain-HTTP LAN device, so no TLS or cookie
    /// configuration is carried.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
