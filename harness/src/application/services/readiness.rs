//! Readiness polling: bounded spin-waits with a fixed step.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::application::ports::ContainerShell;
use crate::application::services::container_ops::exec_output;
use crate::domain::listing::process_listed;

/// Delay between two checks.
pub const POLL_STEP: Duration = Duration::from_millis(200);

/// Run `check` until it returns `true` or `timeout` elapses.
///
/// `check` runs at least once, then every `step` while budget remains; the
/// last sleep is shortened so the poll never overruns `timeout`.
pub async fn poll_until<F>(timeout: Duration, step: Duration, mut check: F) -> bool
where
    F: AsyncFnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        sleep(step.min(deadline - now)).await;
    }
}

/// Wait until `process` shows up in `container`'s `ps ax` listing.
///
/// Best effort: a process that starts after `timeout` is reported missing.
pub async fn wait_running_command(
    rt: &impl ContainerShell,
    process: &str,
    container: &str,
    timeout: Duration,
) -> bool {
    let found = poll_until(timeout, POLL_STEP, async || {
        exec_output(rt, container, "ps ax", None)
            .await
            .is_ok_and(|listing| process_listed(&listing, process))
    })
    .await;
    if !found {
        debug!(container, process, ?timeout, "process not running before timeout");
    }
    found
}
