//! Domain layer: platform naming, reset policies, configuration, and
//! parsing of runtime listings.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`. All functions are synchronous and
//! take data in, returning data out.

pub mod config;
pub mod error;
pub mod layout;
pub mod listing;
pub mod reset;

pub use config::{HarnessConfig, PlatformConfig, RuntimeConfig};
pub use error::{ConfigError, PlatformError};
pub use layout::{LayoutBuilder, PlatformLayout, PlatformTarget};
pub use listing::NameFilter;
pub use reset::ResetPolicy;
