// ── Client facade ──
//
// Owns the mutable endpoint base, the shared fetcher and the cache store.
// Channel operations and accessors live in `crate::channel` as inherent
// methods split by channel.

use std::sync::Arc;

use arc_swap::ArcSwap;
use hermie_api::{Fetcher, TransportConfig, Url};
use tracing::debug;

use crate::config::{ClientConfig, normalize_base_url};
use crate::error::CoreError;
use crate::store::CacheStore;

/// Cached control/telemetry/health client for one controller.
///
/// Cloning is cheap and every clone shares the same base URL and caches,
/// which is what the `spawn_*` operations rely on.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    base_url: ArcSwap<String>,
    fetcher: Fetcher,
    store: CacheStore,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own HTTP connection pool.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let fetcher = Fetcher::new(&transport)?;
        Ok(Self::with_fetcher(fetcher, &config.base_url))
    }

    /// Build a client around an existing fetcher.
    ///
    /// A blank `base_url` falls back to [`DEFAULT_BASE_URL`](crate::DEFAULT_BASE_URL).
    pub fn with_fetcher(fetcher: Fetcher, base_url: &str) -> Self {
        let base_url = ClientConfig::new(base_url).base_url;
        Self {
            inner: Arc::new(ClientInner {
                base_url: ArcSwap::from_pointee(base_url),
                fetcher,
                store: CacheStore::new(),
            }),
        }
    }

    // ── Endpoint base ────────────────────────────────────────────────

    /// Change the network origin for requests issued from now on.
    ///
    /// Input is trimmed and one trailing slash is stripped. Blank input is
    /// ignored and the previous base is kept.
    pub fn set_base_url(&self, url: &str) {
        match normalize_base_url(url) {
            Some(base) => {
                debug!(base_url = %base, "base URL updated");
                self.inner.base_url.store(Arc::new(base));
            }
            None => debug!("ignoring blank base URL"),
        }
    }

    /// The current normalized base URL.
    pub fn base_url(&self) -> String {
        self.inner.base_url.load().as_ref().clone()
    }

    // ── Crate internals ──────────────────────────────────────────────

    /// Resolve `path` (which starts with `/`) against the current base.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, hermie_api::Error> {
        let base = self.inner.base_url.load();
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    pub(crate) fn fetcher(&self) -> &Fetcher {
        &self.inner.fetcher
    }

    pub(crate) fn store(&self) -> &CacheStore {
        &self.inner.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> Client {
        Client::with_fetcher(
            Fetcher::from_reqwest(reqwest_client(), Duration::from_secs(5)),
            base,
        )
    }

    fn reqwest_client() -> hermie_api::reqwest::Client {
        hermie_api::reqwest::Client::new()
    }

    #[test]
    fn set_base_url_normalizes() {
        let c = client("http://old:5000");
        c.set_base_url("  http://host:5000/  ");
        assert_eq!(c.base_url(), "http://host:5000");
    }

    #[test]
    fn blank_base_url_is_ignored() {
        let c = client("http://host:5000");
        c.set_base_url("");
        assert_eq!(c.base_url(), "http://host:5000");
        c.set_base_url("   ");
        assert_eq!(c.base_url(), "http://host:5000");
    }

    #[test]
    fn clones_share_base_url() {
        let a = client("http://a:5000");
        let b = a.clone();
        b.set_base_url("http://b:5000/");
        assert_eq!(a.base_url(), "http://b:5000");
    }

    #[test]
    fn endpoint_joins_path() {
        let c = client("http://host:5000");
        assert_eq!(
            c.endpoint("/control/heat").unwrap().as_str(),
            "http://host:5000/control/heat"
        );
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let c = client("not a url");
        assert!(matches!(
            c.endpoint("/health"),
            Err(hermie_api::Error::InvalidUrl(_))
        ));
    }
}
