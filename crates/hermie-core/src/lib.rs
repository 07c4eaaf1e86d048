//! Cached request/accessor layer between `hermie-api` and its hosts.
//!
//! The host (a block-based scripting runtime, or the `hermie` CLI) cannot
//! await network results, so every interaction is split in two:
//!
//! - **Operations**: [`Client::set_device`], [`Client::fetch_sensor`],
//!   [`Client::check_health`] and their `spawn_*` forms. Each issues one
//!   timeout-bounded request and records the outcome in the cache. They
//!   never return errors; failures are cached like successes.
//!
//! - **Accessors**: synchronous, side-effect-free reads of whatever was
//!   last recorded (`device_field`, `is_device_on`, `sensor_field`,
//!   `has_alert`, `health_status`, ...). Before the first completion they
//!   return sentinels: `""` for text, `false` for predicates, `{}` for JSON.
//!
//! - **[`CacheStore`]**: one lock-free slot per device plus one each for
//!   telemetry and health. An update replaces a slot wholesale, so a
//!   response and an error are never both visible for the same key.
//!
//! - **[`Thresholds`]**: the controller's comfort-band rule set for
//!   client-side alerting.

pub mod alert;
mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alert::{Alert, AlertKind, Thresholds};
pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL, normalize_base_url};
pub use error::CoreError;
pub use model::{
    AlertFlag, Command, Device, DeviceState, EMPTY, HealthReport, HealthStatus, Payload,
    SensorReading,
};
pub use store::{CacheStore, Failure, FailureKind, Slot};
