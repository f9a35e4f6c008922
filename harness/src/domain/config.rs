//! Configuration schema for the harness.
//!
//! Pure types and validators only: loading from disk lives in
//! `crate::infra::config`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::layout::{DEFAULT_USER, PlatformLayout};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `harness.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Container runtime and remote shell settings.
    pub runtime: RuntimeConfig,
    /// Platforms by name.
    pub platforms: BTreeMap<String, PlatformConfig>,
}

/// Binaries, timeouts, and the image build context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub docker: String,
    pub ssh: String,
    pub scp: String,
    /// Timeout for every runtime command except image builds.
    pub command_timeout_secs: u64,
    pub build_timeout_secs: u64,
    /// Build context root; image `foo` is built from `<images_dir>/foo/Dockerfile`.
    pub images_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            docker: "docker".to_string(),
            ssh: "ssh".to_string(),
            scp: "scp".to_string(),
            command_timeout_secs: 30,
            build_timeout_secs: 900,
            images_dir: PathBuf::from("images"),
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }
}

/// One platform: host → image plus run settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    pub images: BTreeMap<String, String>,
    /// Run parameters shared by every host.
    #[serde(default)]
    pub common_parameters: String,
    /// Extra run parameters per host.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default = "default_user")]
    pub user: String,
    /// Readiness poll budget in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_timeout_ms() -> u64 {
    1000
}

impl PlatformConfig {
    /// Build the validated layout of platform `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid (no hosts, parameters for an
    /// undeclared host, colliding container names).
    pub fn layout(&self, name: &str) -> Result<PlatformLayout> {
        let mut builder = PlatformLayout::builder(name, self.images.clone())
            .common_parameters(&self.common_parameters)
            .user(self.user.clone())
            .timeout(Duration::from_millis(self.timeout_ms));
        for (host, parameters) in &self.parameters {
            builder = builder.host_parameters(host, parameters);
        }
        if let Some(network) = &self.network {
            builder = builder.network(network.clone());
        }
        Ok(builder.build()?)
    }
}

impl HarnessConfig {
    /// Layout of the platform called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlatform`] if no such platform is defined,
    /// or the layout validation error.
    pub fn platform(&self, name: &str) -> Result<PlatformLayout> {
        let platform = self
            .platforms
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPlatform {
                name: name.to_string(),
                defined: self
                    .platforms
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        platform.layout(name)
    }

    /// Validate runtime settings and every platform layout.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        validate_binary("runtime.docker", &self.runtime.docker)?;
        validate_binary("runtime.ssh", &self.runtime.ssh)?;
        validate_binary("runtime.scp", &self.runtime.scp)?;
        if self.runtime.command_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "runtime.command_timeout_secs".to_string(),
                value: "0".to_string(),
                valid: "a positive number of seconds".to_string(),
            }
            .into());
        }
        for name in self.platforms.keys() {
            self.platform(name)?;
        }
        Ok(())
    }
}

fn validate_binary(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: "a program name or path".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
