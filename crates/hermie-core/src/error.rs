// ── Core error types ──
//
// Channel operations never surface errors: failures land in the caches
// and are read back through the accessors. These variants cover the
// remaining fallible edges, client construction and parsing host input.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Construction ─────────────────────────────────────────────────
    #[error("Failed to build client: {0}")]
    Api(#[from] hermie_api::Error),

    // ── Input parsing ────────────────────────────────────────────────
    #[error("Unknown device '{name}' (expected one of: {expected})")]
    UnknownDevice { name: String, expected: String },

    #[error("Invalid state '{value}' (expected 'on' or 'off')")]
    InvalidState { value: String },
}
