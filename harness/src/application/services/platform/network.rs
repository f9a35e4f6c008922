//! Network lifecycle.

use anyhow::Result;
use tracing::{info, warn};

use super::PlatformManager;
use crate::application::ports::{ContainerRuntime, RemoteShell};
use crate::application::services::container_ops;
use crate::domain::{NameFilter, PlatformError};

impl<D: ContainerRuntime, S: RemoteShell> PlatformManager<D, S> {
    async fn network_exists(&self) -> Result<bool> {
        let network = self.layout.network();
        Ok(
            container_ops::get_networks(&self.runtime, NameFilter::Containing(network))
                .await?
                .iter()
                .any(|n| n == network),
        )
    }

    /// Create the platform network unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing or the creation fails.
    pub async fn setup_network(&self) -> Result<()> {
        if self.network_exists().await? {
            return Ok(());
        }
        let network = self.layout.network();
        info!(network, "creating network");
        let output = self.runtime.create_network(network).await?;
        if !output.status.success() {
            return Err(PlatformError::command(
                "network create",
                network,
                output.status.code(),
                &output.stderr,
            )
            .into());
        }
        Ok(())
    }

    /// Attach every platform container to the network.
    ///
    /// A container that is already attached, or not running, is reported and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be invoked.
    pub async fn connect_network(&self) -> Result<()> {
        let network = self.layout.network();
        for container in self.layout.containers().values() {
            let output = self.runtime.connect_network(network, container).await?;
            if !output.status.success() {
                warn!(
                    network,
                    container = %container,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "network connect failed"
                );
            }
        }
        Ok(())
    }

    /// Remove the platform network if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing or the removal fails.
    pub async fn teardown_network(&self) -> Result<()> {
        if !self.network_exists().await? {
            return Ok(());
        }
        let network = self.layout.network();
        info!(network, "removing network");
        let output = self.runtime.remove_network(network).await?;
        if !output.status.success() {
            return Err(PlatformError::command(
                "network rm",
                network,
                output.status.code(),
                &output.stderr,
            )
            .into());
        }
        Ok(())
    }
}
