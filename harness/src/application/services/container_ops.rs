//! Container runtime primitives shared by the platform managers.
//!
//! Boolean operations (stop, delete, start, commit, status-only exec) are
//! permissive: any failure, including a failure to spawn the runtime,
//! collapses to `false` so callers can retry idempotently. Data operations
//! (listings, reads, writes, copies, ownership and mode changes) are strict
//! and return a [`PlatformError::Command`] carrying the command, the target
//! and the captured stderr or exit code.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::application::ports::{
    ContainerLifecycle, ContainerShell, ImageStore, NetworkControl, RunSpec,
};
use crate::domain::PlatformError;
use crate::domain::listing::{
    NameFilter, parse_container_ip, parse_installed_version, parse_names, parse_names_of_image,
    shell_quote,
};

/// Options applied after a file lands in a container.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions<'a> {
    /// Append instead of truncating.
    pub append: bool,
    /// `chown` argument, e.g. `"www-data:www-data"`.
    pub owner: Option<&'a str>,
    /// `chmod` argument, e.g. `"600"`.
    pub mode: Option<&'a str>,
}

fn succeeded(what: &str, target: &str, result: Result<Output>) -> bool {
    match result {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            debug!(
                target_name = target,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "{what} failed"
            );
            false
        }
        Err(e) => {
            debug!(target_name = target, error = %e, "{what} failed");
            false
        }
    }
}

fn checked(command: &str, target: &str, output: Output) -> Result<Output> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(PlatformError::command(command, target, output.status.code(), &output.stderr).into())
    }
}

// ── Listings ─────────────────────────────────────────────────────────────────

/// Image names present in the runtime, filtered.
///
/// # Errors
///
/// Returns an error if the listing command fails.
pub async fn get_images(rt: &impl ImageStore, filter: NameFilter<'_>) -> Result<Vec<String>> {
    let output = rt.list_images().await.context("listing images")?;
    let output = checked("images", "runtime", output)?;
    Ok(parse_names(&output.stdout)
        .into_iter()
        .filter(|n| filter.matches(n))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}

/// Container names, filtered; stopped containers only when `all`.
///
/// # Errors
///
/// Returns an error if the listing command fails.
pub async fn get_containers(
    rt: &impl ContainerLifecycle,
    filter: NameFilter<'_>,
    all: bool,
) -> Result<Vec<String>> {
    let output = rt.list_containers(all).await.context("listing containers")?;
    let output = checked("ps", "runtime", output)?;
    Ok(parse_names(&output.stdout)
        .into_iter()
        .filter(|n| filter.matches(n))
        .collect())
}

/// Names of containers created from `image`, platform-owned or not.
///
/// Only the image a container was run from counts; containers of images
/// committed from one of its containers are left out.
///
/// # Errors
///
/// Returns an error if the listing command fails.
pub async fn get_containers_from_image(
    rt: &impl ContainerLifecycle,
    image: &str,
    all: bool,
) -> Result<Vec<String>> {
    let output = rt
        .list_containers_with_images(all)
        .await
        .with_context(|| format!("listing containers of image {image}"))?;
    let output = checked("ps", image, output)?;
    Ok(parse_names_of_image(&output.stdout, image))
}

/// Network names, filtered.
///
/// # Errors
///
/// Returns an error if the listing command fails.
pub async fn get_networks(rt: &impl NetworkControl, filter: NameFilter<'_>) -> Result<Vec<String>> {
    let output = rt.list_networks().await.context("listing networks")?;
    let output = checked("network ls", "runtime", output)?;
    Ok(parse_names(&output.stdout)
        .into_iter()
        .filter(|n| filter.matches(n))
        .collect())
}

// ── Images ───────────────────────────────────────────────────────────────────

/// Build `image` from its build context.
///
/// # Errors
///
/// Returns an error if the build fails.
pub async fn build_image(rt: &impl ImageStore, image: &str) -> Result<()> {
    info!(image, "building image");
    let output = rt
        .build_image(image)
        .await
        .with_context(|| format!("building image {image}"))?;
    checked("build", image, output)?;
    Ok(())
}

pub async fn image_delete(rt: &impl ImageStore, image: &str) -> bool {
    succeeded("rmi", image, rt.remove_image(image).await)
}

/// Remove `image` and every container depending on it.
///
/// This reaches beyond any single platform: containers started by hand or by
/// another platform from the same image are stopped and removed too.
///
/// # Errors
///
/// Returns an error if the dependent containers cannot be listed.
pub async fn image_delete_and_containers(
    rt: &(impl ImageStore + ContainerLifecycle),
    image: &str,
) -> Result<bool> {
    for container in get_containers_from_image(rt, image, false).await? {
        warn!(image, container = %container, "stopping dependent container");
        container_stop(rt, &container).await;
    }
    for container in get_containers_from_image(rt, image, true).await? {
        warn!(image, container = %container, "deleting dependent container");
        container_delete(rt, &container).await;
    }
    Ok(image_delete(rt, image).await)
}

pub async fn commit(rt: &impl ImageStore, container: &str, image: &str) -> bool {
    info!(container, image, "committing container");
    succeeded("commit", container, rt.commit(container, image).await)
}

// ── Containers ───────────────────────────────────────────────────────────────

pub async fn run_container(rt: &impl ContainerLifecycle, spec: &RunSpec<'_>) -> bool {
    info!(image = spec.image, container = spec.name, "running container");
    succeeded("run", spec.name, rt.run_container(spec).await)
}

pub async fn container_start(rt: &impl ContainerLifecycle, container: &str) -> bool {
    info!(container, "starting container");
    succeeded("start", container, rt.start_container(container).await)
}

pub async fn container_stop(rt: &impl ContainerLifecycle, container: &str) -> bool {
    succeeded("stop", container, rt.stop_container(container).await)
}

pub async fn container_delete(rt: &impl ContainerLifecycle, container: &str) -> bool {
    succeeded("rm", container, rt.remove_container(container).await)
}

/// IP address of `container`; empty when it is not running or does not exist.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked or prints unparsable output.
pub async fn container_ip(rt: &impl ContainerLifecycle, container: &str) -> Result<String> {
    let output = rt
        .inspect(container)
        .await
        .with_context(|| format!("inspecting {container}"))?;
    if !output.status.success() {
        return Ok(String::new());
    }
    parse_container_ip(&output.stdout)
}

// ── Shell ────────────────────────────────────────────────────────────────────

/// Stdout of `command` in `container`, whatever its exit status.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked.
pub async fn exec_output(
    rt: &impl ContainerShell,
    container: &str,
    command: &str,
    user: Option<&str>,
) -> Result<String> {
    let output = rt
        .exec(container, user, command)
        .await
        .with_context(|| format!("exec in {container}"))?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Stdout of `command` in `container`; non-zero exit is an error.
///
/// # Errors
///
/// Returns [`PlatformError::Command`] with the captured stderr or exit code.
pub async fn exec_checked(
    rt: &impl ContainerShell,
    container: &str,
    command: &str,
    user: Option<&str>,
) -> Result<String> {
    let output = rt
        .exec(container, user, command)
        .await
        .with_context(|| format!("exec in {container}"))?;
    let output = checked(command, container, output)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Whether `command` exits successfully in `container`.
pub async fn exec_status(
    rt: &impl ContainerShell,
    container: &str,
    command: &str,
    user: Option<&str>,
) -> bool {
    succeeded(command, container, rt.exec(container, user, command).await)
}

pub async fn path_exists(rt: &impl ContainerShell, path: &str, container: &str) -> bool {
    exec_status(rt, container, &format!("test -e {}", shell_quote(path)), None).await
}

/// Write `data` to `dest` in `container`.
///
/// # Errors
///
/// Returns an error if the write, `chown` or `chmod` fails.
pub async fn put_data(
    rt: &impl ContainerShell,
    data: &[u8],
    dest: &str,
    container: &str,
    opts: WriteOptions<'_>,
) -> Result<()> {
    let quoted = shell_quote(dest);
    if opts.append && !path_exists(rt, dest, container).await {
        exec_status(rt, container, &format!("touch {quoted}"), None).await;
    }
    let command = format!("cat {} {quoted}", if opts.append { ">>" } else { ">" });
    let output = rt
        .exec_with_stdin(container, &command, data)
        .await
        .with_context(|| format!("writing {dest} in {container}"))?;
    checked(&command, container, output)?;
    apply_write_options(rt, dest, container, opts).await
}

/// Copy a local file into `container` at `dest`.
///
/// # Errors
///
/// Returns an error if the copy, `chown` or `chmod` fails.
pub async fn put_file(
    rt: &impl ContainerShell,
    source: &Path,
    dest: &str,
    container: &str,
    opts: WriteOptions<'_>,
) -> Result<()> {
    let output = rt
        .copy_in(source, container, dest)
        .await
        .with_context(|| format!("copying {} to {container}", source.display()))?;
    checked(&format!("cp {} {dest}", source.display()), container, output)?;
    apply_write_options(rt, dest, container, opts).await
}

/// Contents of `source` in `container`, unstripped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn get_data(rt: &impl ContainerShell, source: &str, container: &str) -> Result<String> {
    exec_checked(rt, container, &format!("cat {}", shell_quote(source)), None).await
}

/// Copy `source` out of `container` to a local path.
///
/// # Errors
///
/// Returns an error if the copy fails.
pub async fn get_file(
    rt: &impl ContainerShell,
    container: &str,
    source: &str,
    dest: &Path,
) -> Result<()> {
    let output = rt
        .copy_out(container, source, dest)
        .await
        .with_context(|| format!("copying {source} out of {container}"))?;
    checked(&format!("cp {source} {}", dest.display()), container, output)?;
    Ok(())
}

/// # Errors
///
/// Returns an error if `chown` fails.
pub async fn set_owner(rt: &impl ContainerShell, path: &str, owner: &str, container: &str) -> Result<()> {
    let command = format!("chown {} {}", shell_quote(owner), shell_quote(path));
    exec_checked(rt, container, &command, None).await.map(drop)
}

/// # Errors
///
/// Returns an error if `chmod` fails.
pub async fn set_permissions(
    rt: &impl ContainerShell,
    path: &str,
    mode: &str,
    container: &str,
) -> Result<()> {
    let command = format!("chmod {} {}", shell_quote(mode), shell_quote(path));
    exec_checked(rt, container, &command, None).await.map(drop)
}

async fn apply_write_options(
    rt: &impl ContainerShell,
    path: &str,
    container: &str,
    opts: WriteOptions<'_>,
) -> Result<()> {
    if let Some(owner) = opts.owner {
        set_owner(rt, path, owner, container).await?;
    }
    if let Some(mode) = opts.mode {
        set_permissions(rt, path, mode, container).await?;
    }
    Ok(())
}

/// Installed version of package `app`, or `None` if it is not installed.
///
/// # Errors
///
/// Returns an error if the runtime cannot be invoked.
pub async fn get_version(rt: &impl ContainerShell, app: &str, container: &str) -> Result<Option<String>> {
    let policy = exec_output(
        rt,
        container,
        &format!("apt-cache policy {}", shell_quote(app)),
        Some("root"),
    )
    .await?;
    Ok(parse_installed_version(&policy))
}
