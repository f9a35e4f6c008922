//! Reset policies for tearing a platform down.
//!
//! Policies are totally ordered: each one performs all the work of the
//! policies below it, plus its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// How far [`reset`](crate::application::services::platform::PlatformManager::reset)
/// tears a platform down.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Leave everything as is.
    #[default]
    None,
    /// Stop the running platform containers.
    Stop,
    /// Stop, then delete the platform containers.
    RmContainer,
    /// Delete the platform containers, then the platform images.
    RmImage,
    /// Delete the platform images and **every** container created from them,
    /// including containers that belong to other platforms or were started
    /// by hand. An image cannot be removed while a container references it,
    /// so all dependents are stopped and removed first.
    Uproot,
}

impl ResetPolicy {
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Stop,
        Self::RmContainer,
        Self::RmImage,
        Self::Uproot,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Stop => "stop",
            Self::RmContainer => "rm_container",
            Self::RmImage => "rm_image",
            Self::Uproot => "uproot",
        }
    }

    /// `true` when this policy performs all the work of `other`.
    #[must_use]
    pub fn includes(self, other: Self) -> bool {
        self >= other
    }

    #[must_use]
    pub fn stops_containers(self) -> bool {
        self.includes(Self::Stop)
    }

    #[must_use]
    pub fn removes_containers(self) -> bool {
        self.includes(Self::RmContainer)
    }

    #[must_use]
    pub fn removes_images(self) -> bool {
        self.includes(Self::RmImage)
    }

    /// Whether containers outside the platform are removed along with its images.
    #[must_use]
    pub fn removes_dependents(self) -> bool {
        self == Self::Uproot
    }
}

impl fmt::Display for ResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::None),
            "stop" => Ok(Self::Stop),
            "rm_container" => Ok(Self::RmContainer),
            "rm_image" => Ok(Self::RmImage),
            "uproot" => Ok(Self::Uproot),
            other => Err(ConfigError::InvalidValue {
                key: "reset".to_string(),
                value: other.to_string(),
                valid: Self::ALL.map(Self::as_str).join(", "),
            }),
        }
    }
}
