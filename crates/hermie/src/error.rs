//! CLI error types with miette diagnostics.
//!
//! Maps cached channel failures, `CoreError` and `ConfigError` into
//! user-facing errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use hermie_config::ConfigError;
use hermie_core::{CoreError, Failure, FailureKind};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(hermie::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             {reason}\n\
             Try: hermie --base-url http://<host>:5000 health"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {target} timed out")]
    #[diagnostic(
        code(hermie::timeout),
        help("{message}\nIncrease the deadline with --timeout or check controller responsiveness.")
    )]
    Timeout { target: String, message: String },

    // ── Controller responses ─────────────────────────────────────────
    #[error("Controller rejected {target} (HTTP {status}): {message}")]
    #[diagnostic(code(hermie::rejected))]
    Rejected {
        target: String,
        status: u16,
        message: String,
    },

    #[error("Request to {target} failed: {message}")]
    #[diagnostic(code(hermie::request_failed))]
    RequestFailed { target: String, message: String },

    #[error("Controller is not healthy (status: {status})")]
    #[diagnostic(
        code(hermie::unhealthy),
        help("{detail}")
    )]
    Unhealthy { status: String, detail: String },

    #[error("Failed to build HTTP client: {reason}")]
    #[diagnostic(code(hermie::client))]
    ClientBuild { reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hermie::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hermie::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hermie --profile {name} --base-url <url> config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(hermie::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(hermie::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(hermie::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Turn a cached channel failure into an error for `target`.
    pub fn from_failure(target: &str, url: &str, failure: &Failure) -> Self {
        let message = failure.message.clone();
        match failure.kind {
            FailureKind::Timeout => Self::Timeout {
                target: target.into(),
                message,
            },
            FailureKind::Connection => Self::ConnectionFailed {
                url: url.into(),
                reason: message,
            },
            FailureKind::Rejected { status } => Self::Rejected {
                target: target.into(),
                status,
                message,
            },
            FailureKind::Other => Self::RequestFailed {
                target: target.into(),
                message,
            },
        }
    }
}

// ── CoreError / ConfigError → CliError mapping ───────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownDevice { .. } => Self::Validation {
                field: "device".into(),
                reason: err.to_string(),
            },
            CoreError::InvalidState { .. } => Self::Validation {
                field: "state".into(),
                reason: err.to_string(),
            },
            CoreError::Api(e) => Self::ClientBuild {
                reason: e.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use hermie_core::Payload;

    use super::*;

    fn failure(kind: FailureKind) -> Failure {
        Failure {
            kind,
            message: "boom".into(),
            snapshot: Payload::empty(),
        }
    }

    #[test]
    fn failure_kinds_map_to_exit_codes() {
        let url = "http://localhost:5000";
        let cases = [
            (FailureKind::Timeout, exit_code::TIMEOUT),
            (FailureKind::Connection, exit_code::CONNECTION),
            (FailureKind::Rejected { status: 400 }, exit_code::REJECTED),
            (FailureKind::Other, exit_code::GENERAL),
        ];
        for (kind, code) in cases {
            let err = CliError::from_failure("heat", url, &failure(kind));
            assert_eq!(err.exit_code(), code, "{kind:?}");
        }
    }

    #[test]
    fn bad_device_name_is_usage_error() {
        let err = CliError::from(CoreError::UnknownDevice {
            name: "fan".into(),
            expected: "heat, pump".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(err.to_string().contains("fan"));
    }
}
