//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers that need to branch on a failure kind use
//! `anyhow::Error::downcast_ref::<PlatformError>()`.

use thiserror::Error;

// ── Platform errors ──────────────────────────────────────────────────────────

/// Errors raised by platform orchestration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// A host key that is not part of the declared host set.
    #[error("host '{0}' is not part of the platform")]
    UnknownHost(String),

    /// A container name that no host of the platform maps to.
    #[error("container {0} not found")]
    UnknownContainer(String),

    /// An observed count differs from the declared one.
    #[error("Expecting {expected} {what}, found {found}")]
    Expectation {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Readiness poll ran out of budget.
    #[error("Container {container} has no running '{process}'")]
    ProcessNotRunning { container: String, process: String },

    /// A runtime or remote-shell command reported failure.
    #[error("Error while executing <{command}> on {target}: [{detail}]")]
    Command {
        command: String,
        target: String,
        detail: String,
    },

    /// A host-keyed mapping does not cover exactly the platform hosts.
    #[error("host set mismatch (missing: {missing:?}, unexpected: {unexpected:?})")]
    HostSetMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("invalid platform layout: {0}")]
    InvalidLayout(String),
}

impl PlatformError {
    /// Build a [`PlatformError::Command`] from a failed process output,
    /// preferring trimmed stderr and falling back to the exit code.
    #[must_use]
    pub fn command(command: &str, target: &str, status: Option<i32>, stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr);
        let detail = match (stderr.trim(), status) {
            ("", Some(code)) => code.to_string(),
            ("", None) => "terminated by signal".to_string(),
            (text, _) => text.to_string(),
        };
        Self::Command {
            command: command.to_string(),
            target: target.to_string(),
            detail,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration loading and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown platform: {name}\n\nDefined platforms: {defined}")]
    UnknownPlatform { name: String, defined: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
