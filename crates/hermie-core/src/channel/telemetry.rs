// Telemetry channel
//
// `GET {base}/sensor?_=<ts>`. Each fetch replaces the whole snapshot; a
// failure replaces it with `{error, last_read_ok: false}` and drops every
// previous field.

use chrono::Utc;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::Client;
use crate::model::{Payload, SensorReading};
use crate::store::{Failure, Slot};

impl Client {
    // ── Operations ───────────────────────────────────────────────────

    /// Pull a sensor snapshot and replace the cached one.
    pub async fn fetch_sensor(&self) {
        let slot = match self.request_sensor().await {
            Ok(value) => {
                debug!("sensor snapshot updated");
                Slot::Ready(Payload::from(value))
            }
            Err(e) => {
                warn!(error = %e, "sensor fetch failed");
                let snapshot = Payload::from(json!({
                    "error": e.to_string(),
                    "last_read_ok": false,
                }));
                Slot::from_error(&e, snapshot)
            }
        };
        self.store().set_telemetry(slot);
    }

    /// Fire-and-forget [`fetch_sensor`](Self::fetch_sensor).
    pub fn spawn_fetch_sensor(&self) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move { client.fetch_sensor().await })
    }

    async fn request_sensor(&self) -> Result<Value, hermie_api::Error> {
        let mut url = self.endpoint("/sensor")?;
        url.query_pairs_mut()
            .append_pair("_", &Utc::now().timestamp_millis().to_string());
        self.fetcher().get(url).await
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Snapshot field rendered as text, or `""`.
    pub fn sensor_field(&self, field: &str) -> String {
        self.store()
            .telemetry()
            .payload()
            .map(|p| p.text(field))
            .unwrap_or_default()
    }

    /// Snapshot field as a number, for Rust callers.
    pub fn sensor_number(&self, field: &str) -> Option<f64> {
        self.store().telemetry().payload()?.number(field)
    }

    /// The snapshot's `error` field: the server-reported read error on
    /// success, the request failure on failure, otherwise `""`.
    pub fn sensor_error(&self) -> String {
        self.sensor_field("error")
    }

    /// `true` iff the snapshot reports `last_read_ok`.
    pub fn is_sensor_read_ok(&self) -> bool {
        self.store()
            .telemetry()
            .payload()
            .is_some_and(|p| p.flag("last_read_ok"))
    }

    /// `true` iff the snapshot carries a raised `alert`.
    pub fn has_alert(&self) -> bool {
        self.store()
            .telemetry()
            .payload()
            .is_some_and(|p| p.truthy("alert"))
    }

    /// Snapshot as JSON text, or `{}` before the first fetch completes.
    pub fn sensor_as_json(&self) -> String {
        self.store()
            .telemetry()
            .payload()
            .map_or_else(|| "{}".to_owned(), Payload::to_json)
    }

    /// The cached failure, if the last fetch failed.
    pub fn sensor_failure(&self) -> Option<Failure> {
        self.store().telemetry().failure().cloned()
    }

    /// Typed view of the snapshot.
    pub fn sensor_reading(&self) -> Option<SensorReading> {
        self.store().telemetry().payload()?.view()
    }
}
