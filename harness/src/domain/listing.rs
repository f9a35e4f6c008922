//! Parsing of runtime listings and command output.

use std::collections::BTreeSet;

use anyhow::{Context, Result};

/// Which names a listing keeps.
#[derive(Debug, Clone, Copy)]
pub enum NameFilter<'a> {
    Any,
    /// Names containing the substring.
    Containing(&'a str),
    /// Names in the set.
    OneOf(&'a BTreeSet<String>),
}

impl NameFilter<'_> {
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Containing(part) => name.contains(part),
            Self::OneOf(set) => set.contains(name),
        }
    }
}

/// One name per line, as printed by `--format {{.Names}}` style listings.
/// Blank lines and untagged `<none>` entries are skipped.
#[must_use]
pub fn parse_names(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && *l != "<none>")
        .map(str::to_string)
        .collect()
}

/// Names from `name<TAB>image` lines whose image column is exactly `image`.
#[must_use]
pub fn parse_names_of_image(stdout: &[u8], image: &str) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter(|(_, img)| img.trim() == image)
        .map(|(name, _)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Extract a container's IP address from `docker inspect` JSON.
///
/// Prefers the default bridge address and falls back to the first non-empty
/// address among user-defined networks. A stopped container yields `""`.
///
/// # Errors
///
/// Returns an error if the output is not the JSON array `docker inspect` prints.
pub fn parse_container_ip(inspect: &[u8]) -> Result<String> {
    let info: serde_json::Value =
        serde_json::from_slice(inspect).context("parsing docker inspect output")?;
    let settings = info
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("NetworkSettings"))
        .context("docker inspect output has no NetworkSettings")?;

    let primary = settings
        .get("IPAddress")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if !primary.is_empty() {
        return Ok(primary.to_string());
    }
    Ok(settings
        .get("Networks")
        .and_then(|n| n.as_object())
        .into_iter()
        .flat_map(|nets| nets.values())
        .filter_map(|net| net.get("IPAddress").and_then(|v| v.as_str()))
        .find(|ip| !ip.is_empty())
        .unwrap_or_default()
        .to_string())
}

/// Installed version from `apt-cache policy <app>` output.
#[must_use]
pub fn parse_installed_version(policy: &str) -> Option<String> {
    policy
        .lines()
        .map(str::trim_start)
        .find(|line| line.starts_with("Install"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, version)| version.trim())
        .filter(|v| !v.is_empty() && *v != "(none)")
        .map(str::to_string)
}

/// Whether `process` appears anywhere in a `ps ax` listing.
#[must_use]
pub fn process_listed(listing: &str, process: &str) -> bool {
    listing.contains(process)
}

/// Quote `arg` for interpolation into a POSIX shell command line.
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:=,@%".contains(c))
    {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
