//! Dual-mode results: one host, or every host keyed by name.

use std::collections::BTreeMap;

/// Result of an operation addressed to one host or broadcast to all of them.
///
/// Addressing a host yields [`HostOutput::Single`]; broadcasting yields
/// [`HostOutput::PerHost`] keyed by every declared host, each value equal to
/// what the single-host call returns for that host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutput<T> {
    Single(T),
    PerHost(BTreeMap<String, T>),
}

impl<T> HostOutput<T> {
    #[must_use]
    pub fn single(self) -> Option<T> {
        match self {
            Self::Single(value) => Some(value),
            Self::PerHost(_) => None,
        }
    }

    #[must_use]
    pub fn per_host(self) -> Option<BTreeMap<String, T>> {
        match self {
            Self::Single(_) => None,
            Self::PerHost(map) => Some(map),
        }
    }

    /// Value for `host` in a broadcast result.
    #[must_use]
    pub fn get(&self, host: &str) -> Option<&T> {
        match self {
            Self::Single(_) => None,
            Self::PerHost(map) => map.get(host),
        }
    }

    pub fn values(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            Self::Single(value) => Box::new(std::iter::once(value)),
            Self::PerHost(map) => Box::new(map.values()),
        }
    }

    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> HostOutput<U> {
        match self {
            Self::Single(value) => HostOutput::Single(f(value)),
            Self::PerHost(map) => HostOutput::PerHost(map.into_iter().map(|(k, v)| (k, f(v))).collect()),
        }
    }
}

impl HostOutput<bool> {
    /// `true` when every addressed host reported `true`.
    #[must_use]
    pub fn all(&self) -> bool {
        self.values().all(|v| *v)
    }
}
