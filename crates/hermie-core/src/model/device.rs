// ── Device domain types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{AsRefStr, EnumCount, EnumIter, IntoEnumIterator};

use crate::error::CoreError;

/// A relay-driven actuator on the controller.
///
/// Only used as a cache key and a path segment; the controller owns the
/// actual relay state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter, EnumCount,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Device {
    Heat,
    Pump,
}

impl Device {
    /// Key carrying this device's on/off flag in control and telemetry payloads.
    pub fn on_field(self) -> &'static str {
        match self {
            Self::Heat => "heat_on",
            Self::Pump => "pump_on",
        }
    }

    /// Position in fixed-size per-device tables.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Heat => 0,
            Self::Pump => 1,
        }
    }

    /// Every device, in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Comma-separated list of valid names, for error messages.
    pub fn names() -> String {
        Self::iter()
            .map(|d| d.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for Device {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::iter()
            .find(|d| d.as_ref().eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownDevice {
                name: name.to_owned(),
                expected: Self::names(),
            })
    }
}

/// Desired relay state. Parsed case-insensitively, sent lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    On,
    Off,
}

impl DeviceState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(CoreError::InvalidState {
                value: s.trim().to_owned(),
            }),
        }
    }
}

/// A state change request for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub device: Device,
    pub state: DeviceState,
}

impl Command {
    pub fn new(device: Device, state: DeviceState) -> Self {
        Self { device, state }
    }

    /// Parse host-supplied names, e.g. `("Heat", "ON")`.
    pub fn parse(device: &str, state: &str) -> Result<Self, CoreError> {
        Ok(Self {
            device: device.parse()?,
            state: state.parse()?,
        })
    }

    /// Request path relative to the base URL.
    pub fn path(&self) -> String {
        format!("/control/{}", self.device)
    }

    /// JSON body: `{"state": "on"}`.
    pub fn body(&self) -> Value {
        json!({ "state": self.state.as_str() })
    }
}
