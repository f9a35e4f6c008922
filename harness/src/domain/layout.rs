//! Platform layout: hosts, derived image/container names, run parameters.
//!
//! Pure data. A layout never talks to the runtime; the manager re-queries the
//! runtime on every observation instead of caching what it saw.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::domain::error::PlatformError;

pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEPLOYED_SUFFIX: &str = "deployed";

/// Derive the container name for `host` of `platform` running `image`.
#[must_use]
pub fn container_name(image: &str, platform: &str, host: &str) -> String {
    [image, platform, host].join("-")
}

/// Split a parameter string into run tokens on whitespace.
///
/// Quoting is not interpreted; pass tokens through
/// [`LayoutBuilder::common_tokens`] / [`LayoutBuilder::host_tokens`] when a
/// single argument must contain spaces.
#[must_use]
pub fn split_parameters(parameters: &str) -> Vec<String> {
    parameters.split_whitespace().map(str::to_string).collect()
}

/// A named set of logical hosts and everything derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLayout {
    name: String,
    images: BTreeMap<String, String>,
    containers: BTreeMap<String, String>,
    parameters: BTreeMap<String, Vec<String>>,
    network: String,
    user: String,
    timeout: Duration,
}

/// Snapshot of a platform handed to a provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    pub name: String,
    /// host → container name
    pub containers: BTreeMap<String, String>,
    pub network: String,
    pub user: String,
}

impl PlatformLayout {
    /// Start a layout for `name` from a host → image mapping.
    pub fn builder<K, V>(name: impl Into<String>, images: impl IntoIterator<Item = (K, V)>) -> LayoutBuilder
    where
        K: Into<String>,
        V: Into<String>,
    {
        LayoutBuilder {
            name: name.into(),
            images: images
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            common: Vec::new(),
            per_host: BTreeMap::new(),
            network: None,
            user: DEFAULT_USER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host keys in iteration order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    #[must_use]
    pub fn host_count(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn contains_host(&self, host: &str) -> bool {
        self.images.contains_key(host)
    }

    /// host → image
    #[must_use]
    pub fn images(&self) -> &BTreeMap<String, String> {
        &self.images
    }

    /// host → container
    #[must_use]
    pub fn containers(&self) -> &BTreeMap<String, String> {
        &self.containers
    }

    /// Unique image names; hosts sharing an image appear once.
    #[must_use]
    pub fn image_names(&self) -> BTreeSet<String> {
        self.images.values().cloned().collect()
    }

    #[must_use]
    pub fn container_names(&self) -> BTreeSet<String> {
        self.containers.values().cloned().collect()
    }

    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownHost`] if `host` is not declared.
    pub fn image(&self, host: &str) -> Result<&str, PlatformError> {
        self.images
            .get(host)
            .map(String::as_str)
            .ok_or_else(|| PlatformError::UnknownHost(host.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownHost`] if `host` is not declared.
    pub fn container(&self, host: &str) -> Result<&str, PlatformError> {
        self.containers
            .get(host)
            .map(String::as_str)
            .ok_or_else(|| PlatformError::UnknownHost(host.to_string()))
    }

    /// Run tokens for `host`: common tokens first, then host-specific ones.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownHost`] if `host` is not declared.
    pub fn parameters(&self, host: &str) -> Result<&[String], PlatformError> {
        self.parameters
            .get(host)
            .map(Vec::as_slice)
            .ok_or_else(|| PlatformError::UnknownHost(host.to_string()))
    }

    /// Reverse lookup of a host key from its container name.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::UnknownContainer`] if no host maps to `container`.
    pub fn host_from_container(&self, container: &str) -> Result<&str, PlatformError> {
        self.containers
            .iter()
            .find(|(_, name)| name.as_str() == container)
            .map(|(host, _)| host.as_str())
            .ok_or_else(|| PlatformError::UnknownContainer(container.to_string()))
    }

    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check that `mapping` is keyed by exactly the declared hosts.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::HostSetMismatch`] listing missing and
    /// unexpected keys.
    pub fn check_host_keys<V>(&self, mapping: &BTreeMap<String, V>) -> Result<(), PlatformError> {
        let missing: Vec<String> = self
            .hosts()
            .filter(|h| !mapping.contains_key(*h))
            .map(str::to_string)
            .collect();
        let unexpected: Vec<String> = mapping
            .keys()
            .filter(|k| !self.contains_host(k))
            .cloned()
            .collect();
        if missing.is_empty() && unexpected.is_empty() {
            Ok(())
        } else {
            Err(PlatformError::HostSetMismatch {
                missing,
                unexpected,
            })
        }
    }

    /// Layout of the platform baked from this one.
    ///
    /// Each deployed image is named after the base container it is committed
    /// from; each deployed container appends `-deployed` to its image. The
    /// parameters, network, user and timeout are copied.
    #[must_use]
    pub fn deployed(&self) -> PlatformLayout {
        let images: BTreeMap<String, String> = self.containers.clone();
        let containers = images
            .iter()
            .map(|(host, image)| (host.clone(), format!("{image}-{DEPLOYED_SUFFIX}")))
            .collect();
        PlatformLayout {
            name: self.name.clone(),
            images,
            containers,
            parameters: self.parameters.clone(),
            network: self.network.clone(),
            user: self.user.clone(),
            timeout: self.timeout,
        }
    }

    #[must_use]
    pub fn target(&self) -> PlatformTarget {
        PlatformTarget {
            name: self.name.clone(),
            containers: self.containers.clone(),
            network: self.network.clone(),
            user: self.user.clone(),
        }
    }
}

/// Builder for [`PlatformLayout`]; validation happens in [`LayoutBuilder::build`].
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    name: String,
    images: BTreeMap<String, String>,
    common: Vec<String>,
    per_host: BTreeMap<String, Vec<String>>,
    network: Option<String>,
    user: String,
    timeout: Duration,
}

impl LayoutBuilder {
    /// Parameters shared by every host, split on whitespace.
    #[must_use]
    pub fn common_parameters(self, parameters: &str) -> Self {
        self.common_tokens(split_parameters(parameters))
    }

    #[must_use]
    pub fn common_tokens(mut self, tokens: impl IntoIterator<Item = String>) -> Self {
        self.common.extend(tokens);
        self
    }

    /// Parameters for one host, split on whitespace.
    #[must_use]
    pub fn host_parameters(self, host: &str, parameters: &str) -> Self {
        self.host_tokens(host, split_parameters(parameters))
    }

    #[must_use]
    pub fn host_tokens(mut self, host: &str, tokens: impl IntoIterator<Item = String>) -> Self {
        self.per_host
            .entry(host.to_string())
            .or_default()
            .extend(tokens);
        self
    }

    /// Network name; defaults to the platform name.
    #[must_use]
    pub fn network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and derive the container names and per-host parameters.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::InvalidLayout`] for an empty name, no hosts, an
    ///   empty image name, or two hosts deriving the same container name.
    /// - [`PlatformError::UnknownHost`] for parameters given to an undeclared host.
    pub fn build(self) -> Result<PlatformLayout, PlatformError> {
        if self.name.trim().is_empty() {
            return Err(PlatformError::InvalidLayout(
                "platform name is empty".to_string(),
            ));
        }
        if self.images.is_empty() {
            return Err(PlatformError::InvalidLayout(format!(
                "platform '{}' declares no hosts",
                self.name
            )));
        }
        if let Some((host, _)) = self.images.iter().find(|(_, i)| i.trim().is_empty()) {
            return Err(PlatformError::InvalidLayout(format!(
                "host '{host}' has an empty image name"
            )));
        }
        if let Some(host) = self.per_host.keys().find(|h| !self.images.contains_key(*h)) {
            return Err(PlatformError::UnknownHost(host.clone()));
        }

        let containers: BTreeMap<String, String> = self
            .images
            .iter()
            .map(|(host, image)| (host.clone(), container_name(image, &self.name, host)))
            .collect();
        let mut seen = BTreeSet::new();
        for name in containers.values() {
            if !seen.insert(name) {
                return Err(PlatformError::InvalidLayout(format!(
                    "container name '{name}' is derived by more than one host"
                )));
            }
        }

        let parameters = self
            .images
            .keys()
            .map(|host| {
                let mut tokens = self.common.clone();
                if let Some(own) = self.per_host.get(host) {
                    tokens.extend(own.iter().cloned());
                }
                (host.clone(), tokens)
            })
            .collect();

        Ok(PlatformLayout {
            network: self.network.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            images: self.images,
            containers,
            parameters,
            user: self.user,
            timeout: self.timeout,
        })
    }
}
