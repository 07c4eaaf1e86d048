//! CLI configuration: a thin wrapper around `hermie_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --profile, --timeout).

use std::time::Duration;

use hermie_config::ConfigError;
use hermie_core::{ClientConfig, normalize_base_url};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hermie_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Comma-separated profile names, for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the `ClientConfig` for this invocation.
///
/// Precedence: flag/env > profile > `[defaults]`. `--base-url` alone is
/// enough; a profile is only required when one is named explicitly.
pub fn build_client_config(global: &GlobalOpts, config: &Config) -> Result<ClientConfig, CliError> {
    let mut client = match global.base_url.as_deref() {
        Some(raw) => {
            let base_url = normalize_base_url(raw).ok_or_else(|| CliError::Validation {
                field: "base-url".into(),
                reason: "must not be empty".into(),
            })?;
            let timeout = config
                .profiles
                .get(&active_profile_name(global, config))
                .and_then(|p| p.timeout)
                .unwrap_or(config.defaults.timeout);
            ClientConfig::new(&base_url).with_timeout(Duration::from_secs(timeout))
        }
        None => hermie_config::resolve_profile(config, global.profile.as_deref()).map_err(
            |err| match err {
                ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                    name,
                    available: available_profiles(config),
                },
                other => other.into(),
            },
        )?,
    };

    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}
