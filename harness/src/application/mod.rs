//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` and never on `crate::infra`.

pub mod ports;
pub mod services;

pub use ports::{
    CommandRunner, ConfigStore, ContainerLifecycle, ContainerRuntime, ContainerShell, ImageStore,
    NetworkControl, Provisioner, RemoteShell, RunSpec,
};
