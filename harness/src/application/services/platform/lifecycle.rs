//! Reset state machine, image builds, container runs, and host observation.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use tracing::{debug, info, warn};

use super::PlatformManager;
use crate::application::ports::{ContainerRuntime, RemoteShell, RunSpec};
use crate::application::services::container_ops;
use crate::application::services::readiness::wait_running_command;
use crate::domain::{NameFilter, PlatformError, ResetPolicy};

impl<D: ContainerRuntime, S: RemoteShell> PlatformManager<D, S> {
    /// Tear the platform down as far as `policy` says.
    ///
    /// Containers are stopped before they are deleted, and deleted before
    /// the images. [`ResetPolicy::Uproot`] also removes every container
    /// created from the platform images, including ones this platform does
    /// not own.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    pub async fn reset(&self, policy: ResetPolicy) -> Result<()> {
        if policy == ResetPolicy::None {
            return Ok(());
        }
        info!(platform = self.name(), %policy, "resetting platform");
        if policy.stops_containers() {
            self.containers_stop().await?;
        }
        if policy.removes_containers() {
            self.containers_delete().await?;
        }
        if policy.removes_images() {
            self.images_delete(policy.removes_dependents()).await?;
        }
        Ok(())
    }

    /// Platform images currently present in the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the image listing fails.
    pub async fn get_real_images(&self) -> Result<BTreeSet<String>> {
        let expected = self.layout.image_names();
        Ok(
            container_ops::get_images(&self.runtime, NameFilter::OneOf(&expected))
                .await?
                .into_iter()
                .collect(),
        )
    }

    /// Platform containers currently present; stopped ones only when `all`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container listing fails.
    pub async fn get_real_containers(&self, all: bool) -> Result<BTreeSet<String>> {
        let expected = self.layout.container_names();
        Ok(
            container_ops::get_containers(&self.runtime, NameFilter::OneOf(&expected), all)
                .await?
                .into_iter()
                .collect(),
        )
    }

    /// Whether every platform image exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the image listing fails.
    pub async fn images_exist(&self) -> Result<bool> {
        Ok(self.layout.image_names() == self.get_real_images().await?)
    }

    /// Build the missing images, once per unique image name.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset or a build fails.
    pub async fn build_images(&self, reset: ResetPolicy) -> Result<()> {
        self.reset(reset).await?;
        let existing = self.get_real_images().await?;
        for image in self.layout.image_names() {
            if existing.contains(&image) {
                debug!(image = %image, "image exists");
                continue;
            }
            container_ops::build_image(&self.runtime, &image).await?;
        }
        Ok(())
    }

    /// Bring every container up: running ones are left alone, stopped ones
    /// are started, missing ones are created with their run parameters and
    /// the container name as hostname.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset fails or the runtime cannot be queried.
    pub async fn run_containers(&self, reset: ResetPolicy) -> Result<()> {
        self.reset(reset).await?;
        let running = self.get_real_containers(false).await?;
        let existing = self.get_real_containers(true).await?;
        for (host, container) in self.layout.containers() {
            if running.contains(container) {
                debug!(host = %host, container = %container, "container already running");
                continue;
            }
            let up = if existing.contains(container) {
                container_ops::container_start(&self.runtime, container).await
            } else {
                let spec = RunSpec {
                    image: self.layout.image(host)?,
                    name: container,
                    hostname: container,
                    parameters: self.layout.parameters(host)?,
                };
                container_ops::run_container(&self.runtime, &spec).await
            };
            if !up {
                warn!(host = %host, container = %container, "container did not start");
            }
        }
        Ok(())
    }

    /// Delete the platform images, and with `uproot` every dependent container.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    pub async fn images_delete(&self, uproot: bool) -> Result<()> {
        for image in self.get_real_images().await? {
            warn!(image = %image, uproot, "deleting image");
            let deleted = if uproot {
                container_ops::image_delete_and_containers(&self.runtime, &image).await?
            } else {
                container_ops::image_delete(&self.runtime, &image).await
            };
            if !deleted {
                warn!(image = %image, "image was not deleted");
            }
        }
        Ok(())
    }

    /// Stop the running platform containers.
    ///
    /// # Errors
    ///
    /// Returns an error if the container listing fails.
    pub async fn containers_stop(&self) -> Result<()> {
        for container in self.get_real_containers(false).await? {
            info!(container = %container, "stopping container");
            container_ops::container_stop(&self.runtime, &container).await;
        }
        Ok(())
    }

    /// Delete the platform containers, running or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the container listing fails.
    pub async fn containers_delete(&self) -> Result<()> {
        for container in self.get_real_containers(true).await? {
            info!(container = %container, "deleting container");
            container_ops::container_delete(&self.runtime, &container).await;
        }
        Ok(())
    }

    /// Commit each container into `images[host]`, optionally stopping first.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::HostSetMismatch`] if `images` is not keyed by exactly
    ///   the platform hosts.
    /// - [`PlatformError::Expectation`] if some commits failed.
    pub async fn commit_containers(&self, images: &BTreeMap<String, String>, stop: bool) -> Result<()> {
        self.layout.check_host_keys(images)?;
        if stop {
            self.containers_stop().await?;
        }
        let mut committed = 0;
        for (host, container) in self.layout.containers() {
            if container_ops::commit(&self.runtime, container, &images[host]).await {
                committed += 1;
            }
        }
        let expected = self.layout.host_count();
        if committed != expected {
            return Err(PlatformError::Expectation {
                what: "committed containers",
                expected,
                found: committed,
            }
            .into());
        }
        Ok(())
    }

    /// Snapshot of host → IP; a host whose container is not running maps to `""`.
    ///
    /// # Errors
    ///
    /// With `raises`, returns [`PlatformError::Expectation`] carrying the
    /// declared host count and the count of hosts with an IP when they differ.
    pub async fn get_hosts(&self, raises: bool) -> Result<BTreeMap<String, String>> {
        let mut hosts = BTreeMap::new();
        for (host, container) in self.layout.containers() {
            let ip = container_ops::container_ip(&self.runtime, container).await?;
            hosts.insert(host.clone(), ip);
        }
        if raises {
            let expected = self.layout.host_count();
            let found = hosts.values().filter(|ip| !ip.is_empty()).count();
            if found != expected {
                return Err(PlatformError::Expectation {
                    what: "running containers",
                    expected,
                    found,
                }
                .into());
            }
        }
        Ok(hosts)
    }

    /// Wait, host by host, for `process` to run, using the platform timeout
    /// per host. Stops at the first host where it does not show up.
    ///
    /// # Errors
    ///
    /// With `raises`, returns [`PlatformError::ProcessNotRunning`] naming the
    /// container; without, the first miss yields `Ok(false)`.
    pub async fn wait_process(&self, process: &str, raises: bool) -> Result<bool> {
        for container in self.layout.containers().values() {
            if wait_running_command(&self.runtime, process, container, self.layout.timeout()).await {
                continue;
            }
            if raises {
                return Err(PlatformError::ProcessNotRunning {
                    container: container.clone(),
                    process: process.to_string(),
                }
                .into());
            }
            warn!(container = %container, process, "process not running");
            return Ok(false);
        }
        Ok(true)
    }
}
