//! Once-per-session cache of latest versions for outdated packages.

use super::fetch;
use crate::process::CommandRunner;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

/// Package identifier -> latest available version.
#[derive(Default)]
pub struct OutdatedCache {
    latest: RwLock<HashMap<String, String>>,
    warmed: OnceCell<()>,
}

impl OutdatedCache {
    pub(super) async fn warm_up(&self, runner: &dyn CommandRunner, timeout: Duration) {
        self.warmed
            .get_or_init(|| async {
                let started = Instant::now();
                // Each backend merges its own results; one failing leaves the other intact.
                tokio::join!(
                    async { self.merge("brew", fetch::brew_outdated(runner, timeout).await) },
                    async { self.merge("npm", fetch::npm_outdated(runner, timeout).await) },
                );
                tracing::info!(
                    entries = self.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "outdated cache warmed"
                );
            })
            .await;
    }

    fn merge(&self, backend: &str, entries: Option<Vec<(String, String)>>) {
        let Some(entries) = entries else {
            tracing::warn!(backend, "outdated listing unavailable");
            return;
        };
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        for (package, version) in entries {
            latest.insert(package, version);
        }
    }

    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.warmed.initialized()
    }

    #[must_use]
    pub fn latest(&self, package: &str) -> Option<String> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(package)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
