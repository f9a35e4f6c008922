//! Deployed platforms: a base platform provisioned once, then baked into
//! images so later runs start from the provisioned state.
//!
//! The bake is cached by image existence alone. Resetting the deployed
//! platform with [`ResetPolicy::RmImage`] or above forces re-provisioning.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{ContainerRuntime, Provisioner, RemoteShell};
use crate::application::services::PlatformManager;
use crate::domain::ResetPolicy;

/// Platform derived from `base` by provisioning `distribution` onto it.
pub struct DeployedPlatformManager<'a, D, S, P> {
    base: &'a PlatformManager<D, S>,
    platform: PlatformManager<D, S>,
    distribution: String,
    provisioner: P,
}

impl<'a, D: Clone, S: Clone, P> DeployedPlatformManager<'a, D, S, P> {
    /// Derive the deployed layout from `base`; nothing runs until
    /// [`setup`](Self::setup).
    #[must_use]
    pub fn new(base: &'a PlatformManager<D, S>, distribution: impl Into<String>, provisioner: P) -> Self {
        let platform = PlatformManager::new(
            base.layout().deployed(),
            base.runtime().clone(),
            base.shell().clone(),
        );
        Self {
            base,
            platform,
            distribution: distribution.into(),
            provisioner,
        }
    }
}

impl<D, S, P> DeployedPlatformManager<'_, D, S, P> {
    /// The deployed platform, for fan-out operations and teardown.
    #[must_use]
    pub fn platform(&self) -> &PlatformManager<D, S> {
        &self.platform
    }

    #[must_use]
    pub fn base(&self) -> &PlatformManager<D, S> {
        self.base
    }

    #[must_use]
    pub fn distribution(&self) -> &str {
        &self.distribution
    }

    #[must_use]
    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }
}

impl<D: ContainerRuntime, S: RemoteShell, P: Provisioner> DeployedPlatformManager<'_, D, S, P> {
    /// Bring the deployed platform up, provisioning the base platform first
    /// when the deployed images are missing.
    ///
    /// On return the provisioner targets the deployed platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset, the deployment, a commit, or the
    /// container runs fail.
    pub async fn setup(&mut self, reset: ResetPolicy) -> Result<()> {
        self.platform.reset(reset).await?;
        if self.platform.images_exist().await? {
            info!(platform = self.platform.name(), "deployed images present");
        } else {
            info!(
                platform = self.base.name(),
                distribution = %self.distribution,
                "provisioning base platform"
            );
            self.provisioner.register_platform(self.base.layout().target());
            self.base.run_containers(ResetPolicy::RmContainer).await?;
            self.provisioner.set_platform(&self.distribution);
            self.provisioner
                .deploy_from_scratch(true)
                .await
                .with_context(|| format!("deploying {} onto {}", self.distribution, self.base.name()))?;
            self.base
                .commit_containers(self.platform.layout().images(), true)
                .await?;
        }
        self.platform.run_containers(ResetPolicy::RmContainer).await?;
        self.provisioner.register_platform(self.platform.layout().target());
        self.provisioner.set_platform(&self.distribution);
        Ok(())
    }
}
