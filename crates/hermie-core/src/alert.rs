// ── Environmental alert thresholds ──
//
// The controller computes its own `alert` field; this is the same rule set
// evaluated client-side so watchers can alert on readings from any source.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::SensorReading;

/// Comfort band for the monitored enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_temp_high_f")]
    pub temp_high_f: f64,
    #[serde(default = "default_temp_low_f")]
    pub temp_low_f: f64,
    #[serde(default = "default_humidity_low")]
    pub humidity_low: f64,
    #[serde(default = "default_humidity_high")]
    pub humidity_high: f64,
}

fn default_temp_high_f() -> f64 {
    85.0
}
fn default_temp_low_f() -> f64 {
    70.0
}
fn default_humidity_low() -> f64 {
    65.0
}
fn default_humidity_high() -> f64 {
    99.97
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_high_f: default_temp_high_f(),
            temp_low_f: default_temp_low_f(),
            humidity_low: default_humidity_low(),
            humidity_high: default_humidity_high(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    HighTemperature,
    LowTemperature,
    HighHumidity,
    LowHumidity,
}

impl AlertKind {
    /// 16-column label for character displays.
    pub fn label(self) -> &'static str {
        match self {
            Self::HighTemperature => "Alert: High temp",
            Self::LowTemperature => "Alert: Low temp",
            Self::HighHumidity => "Alert: High hum",
            Self::LowHumidity => "Alert: Low humid",
        }
    }
}

/// A violated threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

impl Thresholds {
    /// First violated rule, checked in order: high temperature, low
    /// temperature, high humidity, low humidity. No temperature, no alert.
    pub fn evaluate(&self, temp_f: Option<f64>, humidity: Option<f64>) -> Option<Alert> {
        let temp_f = temp_f?;

        if temp_f > self.temp_high_f {
            return Some(Alert {
                kind: AlertKind::HighTemperature,
                message: format!(
                    "Temperature {temp_f:.1}F exceeds {}F",
                    fmt_limit(self.temp_high_f)
                ),
            });
        }
        if temp_f < self.temp_low_f {
            return Some(Alert {
                kind: AlertKind::LowTemperature,
                message: format!(
                    "Temperature {temp_f:.1}F below {}F",
                    fmt_limit(self.temp_low_f)
                ),
            });
        }

        let humidity = humidity?;
        if humidity > self.humidity_high {
            return Some(Alert {
                kind: AlertKind::HighHumidity,
                message: format!(
                    "Humidity {humidity:.1}% exceeds {}%",
                    fmt_limit(self.humidity_high)
                ),
            });
        }
        if humidity < self.humidity_low {
            return Some(Alert {
                kind: AlertKind::LowHumidity,
                message: format!(
                    "Humidity {humidity:.1}% below {}%",
                    fmt_limit(self.humidity_low)
                ),
            });
        }

        None
    }

    pub fn evaluate_reading(&self, reading: &SensorReading) -> Option<Alert> {
        self.evaluate(reading.temperature_f, reading.humidity)
    }
}

/// Whole limits keep one decimal (`85.0`), others print as-is (`99.97`).
fn fmt_limit(limit: f64) -> String {
    if limit.fract() == 0.0 {
        format!("{limit:.1}")
    } else {
        format!("{limit}")
    }
}
