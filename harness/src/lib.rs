//! Platform harness: ephemeral multi-host container platforms for integration tests.
//!
//! A platform is a named set of logical hosts, each backed by a container
//! derived from an image, all attached to a shared network. The
//! [`PlatformManager`](application::services::platform::PlatformManager)
//! drives the build/run/reset lifecycle and fans shell-style operations out
//! across the hosts.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod domain;
pub mod infra;
