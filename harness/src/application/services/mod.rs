//! Application services: runtime primitives, readiness polling, and the
//! platform managers built on top of them.
//!
//! Each module imports only from `crate::domain` and `crate::application::ports`.

pub mod container_ops;
pub mod deployed;
pub mod fanout;
pub mod platform;
pub mod readiness;


pub use deployed::DeployedPlatformManager;
pub use fanout::HostOutput;
pub use platform::{PlatformManager, PlatformStep};
