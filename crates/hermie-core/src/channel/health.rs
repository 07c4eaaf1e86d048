// Health channel
//
// `GET {base}/health`. A failure replaces the snapshot with
// `{status: "error", error}`.

use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::Client;
use crate::model::{HealthReport, Payload};
use crate::store::{Failure, Slot};

impl Client {
    /// Pull a health snapshot and replace the cached one.
    pub async fn check_health(&self) {
        let slot = match self.request_health().await {
            Ok(value) => {
                debug!("health snapshot updated");
                Slot::Ready(Payload::from(value))
            }
            Err(e) => {
                warn!(error = %e, "health check failed");
                let snapshot = Payload::from(json!({
                    "status": "error",
                    "error": e.to_string(),
                }));
                Slot::from_error(&e, snapshot)
            }
        };
        self.store().set_health(slot);
    }

    /// Fire-and-forget [`check_health`](Self::check_health).
    pub fn spawn_check_health(&self) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move { client.check_health().await })
    }

    async fn request_health(&self) -> Result<Value, hermie_api::Error> {
        let url = self.endpoint("/health")?;
        self.fetcher().get(url).await
    }

    pub fn health_status(&self) -> String {
        self.health_field("status")
    }

    pub fn health_error(&self) -> String {
        self.health_field("error")
    }

    /// `true` iff the cached status is exactly `"ok"`.
    pub fn is_healthy(&self) -> bool {
        self.health_status() == "ok"
    }

    pub fn health_as_json(&self) -> String {
        self.store()
            .health()
            .payload()
            .map_or_else(|| "{}".to_owned(), Payload::to_json)
    }

    pub fn health_failure(&self) -> Option<Failure> {
        self.store().health().failure().cloned()
    }

    pub fn health_report(&self) -> Option<HealthReport> {
        self.store().health().payload()?.view()
    }

    fn health_field(&self, field: &str) -> String {
        self.store()
            .health()
            .payload()
            .map(|p| p.text(field))
            .unwrap_or_default()
    }
}
