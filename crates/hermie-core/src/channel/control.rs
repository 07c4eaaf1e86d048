// Device control channel
//
// `POST {base}/control/{device}` with `{"state": "on"|"off"}`. The latest
// outcome per device lands in that device's slot; failures are absorbed.

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::Client;
use crate::model::{Command, Device, DeviceState, Payload};
use crate::store::{Failure, Slot};

impl Client {
    // ── Operations ───────────────────────────────────────────────────

    /// Send a state change and cache the outcome for `device`.
    ///
    /// Never fails outward: on success the response replaces the device's
    /// slot and clears its error, on failure the error text replaces it
    /// and clears the response.
    pub async fn set_device(&self, device: Device, state: DeviceState) {
        let command = Command::new(device, state);
        let slot = match self.send_command(&command).await {
            Ok(value) => {
                debug!(%device, %state, "device command acknowledged");
                Slot::Ready(Payload::from(value))
            }
            Err(e) => {
                warn!(%device, %state, error = %e, "device command failed");
                Slot::from_error(&e, Payload::empty())
            }
        };
        self.store().set_device(device, slot);
    }

    /// Fire-and-forget [`set_device`](Self::set_device) on the Tokio runtime.
    pub fn spawn_set_device(&self, device: Device, state: DeviceState) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move { client.set_device(device, state).await })
    }

    async fn send_command(&self, command: &Command) -> Result<Value, hermie_api::Error> {
        let url = self.endpoint(&command.path())?;
        self.fetcher().post_json(url, &command.body()).await
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Field from the cached response, rendered as text, or `""`.
    pub fn device_field(&self, device: Device, field: &str) -> String {
        self.store()
            .device(device)
            .response()
            .map(|p| p.text(field))
            .unwrap_or_default()
    }

    /// Error from the last failed command, or `""`.
    pub fn device_error(&self, device: Device) -> String {
        self.store()
            .device(device)
            .error()
            .map(str::to_owned)
            .unwrap_or_default()
    }

    /// Whether `device` is on.
    ///
    /// The `{device}_on` flag from the cached control response wins; when
    /// that response lacks it (or there is none), the telemetry snapshot's
    /// flag is used; with neither, `false`.
    pub fn is_device_on(&self, device: Device) -> bool {
        let field = device.on_field();

        let control = self.store().device(device);
        if let Some(response) = control.response().filter(|p| p.has(field)) {
            return response.flag(field);
        }

        self.store()
            .telemetry()
            .payload()
            .is_some_and(|p| p.flag(field))
    }

    /// Cached response as JSON text, or `{}`.
    pub fn device_as_json(&self, device: Device) -> String {
        self.store()
            .device(device)
            .response()
            .map_or_else(|| "{}".to_owned(), Payload::to_json)
    }

    /// The cached failure, if the last command failed.
    pub fn device_failure(&self, device: Device) -> Option<Failure> {
        self.store().device(device).failure().cloned()
    }

    /// The cached response payload, if the last command succeeded.
    pub fn device_response(&self, device: Device) -> Option<Payload> {
        self.store().device(device).response().cloned()
    }
}
