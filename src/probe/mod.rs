//! Version detection: local installs and latest-available versions.
//!
//! Local probes never fail; every failure path resolves to
//! [`LocalVersion::Missing`]. Remote probes read a shared cache that is
//! warmed once per session from two independent "outdated" listings.

mod cache;
mod fetch;
mod local;

use crate::catalog::ToolDescriptor;
use crate::process::CommandRunner;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use cache::OutdatedCache;

/// Sentinel rendered for tools that are not installed.
pub const MISSING: &str = "MISSING";

/// Outdated listings hit the network and are much slower than a `--version` call.
const DEFAULT_WARM_UP_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a local probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocalVersion {
    /// Not installed, or every probe path failed.
    Missing,
    /// Installed, but no version could be read.
    Detected,
    Version(String),
}

impl LocalVersion {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Version(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for LocalVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str(MISSING),
            Self::Detected => f.write_str("Detected"),
            Self::Version(v) => f.write_str(v),
        }
    }
}

/// Result of a remote probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RemoteVersion {
    /// Cache not warmed yet; must be asked again later.
    Checking,
    Unknown,
    Version(String),
}

impl RemoteVersion {
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Version(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Version(_))
    }
}

impl fmt::Display for RemoteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => f.write_str("Checking..."),
            Self::Unknown => f.write_str(crate::version::UNKNOWN),
            Self::Version(v) => f.write_str(v),
        }
    }
}

/// Probes installed and latest versions of catalog tools.
pub struct Detector {
    runner: Arc<dyn CommandRunner>,
    probe_timeout: Duration,
    warm_up_timeout: Duration,
    cache: OutdatedCache,
}

impl Detector {
    pub fn new(runner: Arc<dyn CommandRunner>, probe_timeout: Duration) -> Self {
        Self {
            runner,
            probe_timeout,
            warm_up_timeout: DEFAULT_WARM_UP_TIMEOUT,
            cache: OutdatedCache::default(),
        }
    }

    #[must_use]
    pub fn with_warm_up_timeout(mut self, timeout: Duration) -> Self {
        self.warm_up_timeout = timeout;
        self
    }

    /// Installed version of `tool`. Never fails.
    pub async fn local_version(&self, tool: &ToolDescriptor) -> LocalVersion {
        let version = local::probe(self.runner.as_ref(), self.probe_timeout, tool).await;
        tracing::debug!(tool = %tool.id, binary = %tool.binary, %version, "local probe");
        version
    }

    /// Fetch both outdated listings concurrently. Only the first call does work;
    /// concurrent callers wait for that first run to finish.
    pub async fn warm_up(&self) {
        self.cache
            .warm_up(self.runner.as_ref(), self.warm_up_timeout)
            .await;
    }

    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.cache.is_warm()
    }

    /// Latest known version of `tool` given its local version.
    #[must_use]
    pub fn remote_version(&self, tool: &ToolDescriptor, local: &LocalVersion) -> RemoteVersion {
        let local_version = match local {
            LocalVersion::Missing => return RemoteVersion::Unknown,
            LocalVersion::Detected => None,
            LocalVersion::Version(v) => Some(v.as_str()),
        };

        if let Some(latest) = self.cache.latest(tool.package_or_binary()) {
            return RemoteVersion::Version(latest);
        }

        if !self.cache.is_warm() {
            return RemoteVersion::Checking;
        }

        // Not listed as outdated: the local install is the latest.
        local_version.map_or(RemoteVersion::Unknown, |v| {
            RemoteVersion::Version(v.to_string())
        })
    }
}
