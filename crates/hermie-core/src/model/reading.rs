// ── Typed views over telemetry and health snapshots ──
//
// The caches keep raw payloads; these views are for Rust callers that want
// real types. Every field is optional and leniently typed so any object
// snapshot deserializes, matching what the `Payload` accessors accept.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::device::Device;
use super::payload::{is_on, is_truthy, render_text};

/// Alert indicator from the sensor endpoint: a plain boolean or a message
/// string such as `"high_temp: 90.0F > 85.0F"`. Numbers read as booleans
/// (non-zero is raised).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertFlag {
    Raised(bool),
    Message(String),
}

impl AlertFlag {
    pub fn is_raised(&self) -> bool {
        match self {
            Self::Raised(raised) => *raised,
            Self::Message(msg) => !msg.is_empty(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(msg) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }
}

impl From<&Value> for AlertFlag {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(msg) => Self::Message(msg.clone()),
            other => Self::Raised(is_truthy(other)),
        }
    }
}

impl<'de> Deserialize<'de> for AlertFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|v| Self::from(&v))
    }
}

/// One sensor snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature_f: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
    pub alert: Option<AlertFlag>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub last_read_ok: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp_iso: Option<String>,
    /// Everything else the server echoed, including per-device `*_on` flags.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field deserializers that accept whatever JSON type the controller sends
/// and fall back to "absent" instead of failing the whole view.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{is_on, render_text};

    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub(super) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Some(render_text(&Value::deserialize(d)?)).filter(|s| !s.is_empty()))
    }

    pub(super) fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(is_on(&Value::deserialize(d)?))
    }
}

impl SensorReading {
    /// Parsed `timestamp_iso`, if present and RFC 3339.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp_iso
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
    }

    /// Relay state reported by telemetry, if the snapshot carries one.
    pub fn device_on(&self, device: Device) -> Option<bool> {
        self.extra
            .get(device.on_field())
            .filter(|v| !v.is_null())
            .map(is_on)
    }

    pub fn has_alert(&self) -> bool {
        self.alert.as_ref().is_some_and(AlertFlag::is_raised)
    }
}

/// Coarse controller health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
    Other(String),
}

impl HealthStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "ok" => Self::Ok,
            "degraded" => Self::Degraded,
            "error" => Self::Error,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::Degraded => "degraded",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }
}

/// One health snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn status(&self) -> Option<HealthStatus> {
        self.status.as_deref().map(HealthStatus::parse)
    }

    pub fn is_ok(&self) -> bool {
        self.status() == Some(HealthStatus::Ok)
    }
}
