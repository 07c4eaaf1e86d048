// Bounded HTTP fetcher
//
// One attempt per call, raced against a scoped deadline. Responses are
// normalized into either a parsed JSON value or a typed `Error`; nothing
// here retries or caches.

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::deadline::Deadline;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Timeout-bounded JSON fetcher shared by all channels.
///
/// Cheap to clone; the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    /// Build a fetcher from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            timeout: transport.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// The hard per-request deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── Public verbs ─────────────────────────────────────────────────

    /// `GET url` with no-cache semantics.
    pub async fn get(&self, url: Url) -> Result<Value, Error> {
        self.fetch(Method::GET, url, None, None).await
    }

    /// `POST url` with a JSON body and no-cache semantics.
    pub async fn post_json(&self, url: Url, body: &Value) -> Result<Value, Error> {
        self.fetch(Method::POST, url, None, Some(body)).await
    }

    /// Issue one request and parse the JSON response.
    ///
    /// Fails with [`Error::Timeout`] if the whole exchange (connect, status,
    /// body read and parse) does not finish within the deadline; the
    /// in-flight request is dropped at that point.
    pub async fn fetch(
        &self,
        method: Method,
        url: Url,
        headers: Option<HeaderMap>,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        debug!("{method} {url}");

        let deadline = Deadline::arm(self.timeout);

        tokio::select! {
            biased;
            () = deadline.expired() => {
                warn!(%url, timeout = ?deadline.after(), "request deadline expired");
                Err(Error::Timeout { timeout: deadline.after() })
            }
            result = self.exchange(method, url.clone(), headers, body) => result,
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn exchange(
        &self,
        method: Method,
        url: Url,
        headers: Option<HeaderMap>,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let mut request = self
            .http
            .request(method, url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .header(PRAGMA, HeaderValue::from_static("no-cache"));

        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Decode {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// Pull the `error` field out of a failed response body.
///
/// An unreadable or non-JSON body is treated as an empty object, which
/// falls through to the generic `HTTP {status}` message.
async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let parsed: Value =
        serde_json::from_str(&raw).unwrap_or_else(|_| Value::Object(Default::default()));

    let message = parsed
        .get("error")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);

    Error::Http {
        status: status.as_u16(),
        message,
    }
}
