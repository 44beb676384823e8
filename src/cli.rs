//! Command-line interface: flags, config resolution and the one-shot `list` mode.

use crate::catalog::{Catalog, Category};
use crate::config::Config;
use crate::probe::Detector;
use crate::process::CommandRunner;
use crate::tui::{ToolStatus, resting_status};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Inventory and update the developer tools on this machine
#[derive(Parser, Debug)]
#[command(name = "spark", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: <config dir>/spark/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog file overriding the built-in tool list
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Timeout for each local version probe
    #[arg(long, global = true, value_name = "SECS")]
    pub probe_timeout: Option<u64>,

    /// Timeout for each tool update
    #[arg(long, global = true, value_name = "SECS")]
    pub update_timeout: Option<u64>,

    /// Open the dashboard without the splash screen
    #[arg(long)]
    pub no_splash: bool,

    /// Write debug logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe every tool and print versions without the dashboard
    List(ListArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print a JSON array instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Load the config file and apply flag overrides on top.
    ///
    /// A file named with `--config` must exist; the default location is optional.
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_file(path),
            None => Config::load_from(&Config::default_path()),
        }
        .context("failed to load config")?;
        Ok(self.apply_overrides(config))
    }

    /// Flags win over the config file.
    #[must_use]
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(path) = &self.catalog {
            config.catalog = Some(path.clone());
        }
        if let Some(secs) = self.probe_timeout {
            config.probe_timeout_secs = secs;
        }
        if let Some(secs) = self.update_timeout {
            config.update_timeout_secs = secs;
        }
        if self.no_splash {
            config.splash_millis = 0;
        }
        config
    }
}

/// The configured catalog file, or the built-in list.
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

/// One row of `spark list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub local: String,
    pub remote: String,
    pub status: ToolStatus,
}

impl ListEntry {
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{:<6} {:<24} {:<8} {:<16} {:<16} {}",
            self.id,
            self.name,
            self.category.tag(),
            self.local,
            self.remote,
            self.status
        )
    }
}

/// Probe the whole catalog the way the dashboard does: local probes
/// concurrently, one warm-up, then remote lookups.
pub async fn probe_catalog(catalog: &Catalog, detector: &Detector) -> Vec<ListEntry> {
    let locals = join_all(catalog.tools().iter().map(|t| detector.local_version(t))).await;
    detector.warm_up().await;

    catalog
        .tools()
        .iter()
        .zip(locals)
        .map(|(tool, local)| {
            let remote = detector.remote_version(tool, &local);
            ListEntry {
                id: tool.id.clone(),
                name: tool.name.clone(),
                category: tool.category,
                status: resting_status(Some(&local), &remote),
                local: local.to_string(),
                remote: remote.to_string(),
            }
        })
        .collect()
}

pub async fn list(
    args: &ListArgs,
    config: &Config,
    catalog: &Catalog,
    runner: Arc<dyn CommandRunner>,
) -> Result<()> {
    let detector = Detector::new(runner, config.probe_timeout());
    let entries = probe_catalog(catalog, &detector).await;
    tracing::info!(tools = entries.len(), "listed catalog");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry.line());
        }
    }
    Ok(())
}
