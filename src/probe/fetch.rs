//! Backend "what's outdated" listings.
//!
//! Both commands exit non-zero when something is outdated, so only the JSON
//! on stdout is inspected.

use crate::process::{CommandOutput, CommandRunner, CommandSpec};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct BrewOutdated {
    #[serde(default)]
    formulae: Vec<BrewItem>,
    #[serde(default)]
    casks: Vec<BrewItem>,
}

#[derive(Debug, Deserialize)]
struct BrewItem {
    name: String,
    /// Latest version available from the tap.
    current_version: String,
}

#[derive(Debug, Deserialize)]
struct NpmItem {
    #[serde(default)]
    latest: Option<String>,
}

/// `brew outdated --json=v2`: formulae and casks.
pub(super) async fn brew_outdated(
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> Option<Vec<(String, String)>> {
    let spec = CommandSpec::new("brew", timeout).args(["outdated", "--json=v2"]);
    let output = listing_output(runner, &spec).await?;
    parse_brew(&output.stdout)
}

/// `npm outdated -g --json`: global packages.
pub(super) async fn npm_outdated(
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> Option<Vec<(String, String)>> {
    let spec = CommandSpec::new("npm", timeout).args(["outdated", "-g", "--json"]);
    let output = listing_output(runner, &spec).await?;
    parse_npm(&output.stdout)
}

async fn listing_output(runner: &dyn CommandRunner, spec: &CommandSpec) -> Option<CommandOutput> {
    match runner.run(spec).await {
        Ok(output) if output.timed_out => {
            tracing::warn!(command = %spec, "outdated listing timed out");
            None
        }
        Ok(output) => Some(output),
        Err(e) => {
            tracing::debug!(command = %spec, error = %e, "outdated listing unavailable");
            None
        }
    }
}

pub(super) fn parse_brew(stdout: &str) -> Option<Vec<(String, String)>> {
    let data: BrewOutdated = match serde_json::from_str(stdout.trim()) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable brew outdated output");
            return None;
        }
    };
    Some(
        data.formulae
            .into_iter()
            .chain(data.casks)
            .map(|item| (item.name, item.current_version))
            .collect(),
    )
}

pub(super) fn parse_npm(stdout: &str) -> Option<Vec<(String, String)>> {
    let trimmed = stdout.trim();
    // Nothing outdated prints nothing at all.
    if trimmed.is_empty() {
        return Some(Vec::new());
    }
    let data: HashMap<String, NpmItem> = match serde_json::from_str(trimmed) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable npm outdated output");
            return None;
        }
    };
    Some(
        data.into_iter()
            .filter_map(|(package, item)| item.latest.map(|latest| (package, latest)))
            .collect(),
    )
}
