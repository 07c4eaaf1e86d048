//! Shared configuration for Hermie tools.
//!
//! TOML profiles, global defaults and alert thresholds, layered with
//! `HERMIE_` environment overrides, and translation to
//! `hermie_core::ClientConfig`. The CLI adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hermie_core::{ClientConfig, Thresholds, normalize_base_url};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Comfort band used by `sensor` and `watch`.
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            thresholds: Thresholds::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-request deadline, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between sensor polls in `watch`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Minimum seconds between repeated alert notifications.
    #[serde(default = "default_buzz_cooldown")]
    pub buzz_cooldown: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            buzz_cooldown: default_buzz_cooldown(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}
fn default_poll_interval() -> u64 {
    15
}
fn default_buzz_cooldown() -> u64 {
    300
}

/// A named controller profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller origin (e.g., "http://hermie.local:5000").
    pub base_url: String,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Config {
    /// Name of the profile to use when none is requested.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hermie", "hermie").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hermie");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then `HERMIE_` environment overrides.
///
/// Nested keys use a double underscore: `HERMIE_DEFAULTS__TIMEOUT=10`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HERMIE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution (without CLI flags) ──────────────────────────

/// Build a `ClientConfig` from a profile plus global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let base_url = normalize_base_url(&profile.base_url).ok_or_else(|| ConfigError::Validation {
        field: "base_url".into(),
        reason: "must not be empty".into(),
    })?;

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(ClientConfig::new(&base_url).with_timeout(Duration::from_secs(timeout)))
}

/// Resolve `name` (or the default profile) into a `ClientConfig`.
///
/// An absent *default* profile falls back to `ClientConfig::default()`
/// with the configured timeout; an absent *named* profile is an error.
pub fn resolve_profile(cfg: &Config, name: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let profile_name = name.unwrap_or_else(|| cfg.default_profile_name());

    match cfg.profiles.get(profile_name) {
        Some(profile) => profile_to_client_config(profile, &cfg.defaults),
        None if name.is_none() => {
            Ok(ClientConfig::default().with_timeout(Duration::from_secs(cfg.defaults.timeout)))
        }
        None => Err(ConfigError::UnknownProfile {
            name: profile_name.into(),
        }),
    }
}
