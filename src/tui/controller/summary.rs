use crate::catalog::Catalog;
use crate::tui::types::UpdateOutcome;

/// One line of the summary: a tool and its new version or failure text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub index: usize,
    pub name: String,
    pub detail: String,
    /// Failure needs a manual update.
    pub manual: bool,
}

/// Result of one update batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Tools left unselected.
    pub skipped: usize,
    pub updated: Vec<SummaryEntry>,
    pub failures: Vec<SummaryEntry>,
}

impl SummaryStats {
    pub(super) fn build(
        catalog: &Catalog,
        results: &[(usize, UpdateOutcome)],
        attempted: usize,
        selected: usize,
    ) -> Self {
        let mut stats = Self {
            attempted,
            skipped: catalog.len().saturating_sub(selected),
            ..Self::default()
        };

        for (index, outcome) in results {
            let name = catalog
                .get(*index)
                .map_or_else(|| format!("#{index}"), |t| t.name.clone());
            match outcome {
                UpdateOutcome::Success { hint, confirmed } => {
                    stats.succeeded += 1;
                    stats.updated.push(SummaryEntry {
                        index: *index,
                        name,
                        detail: confirmed.version().unwrap_or(hint.as_str()).to_string(),
                        manual: false,
                    });
                }
                UpdateOutcome::Failure { message, manual } => {
                    stats.failed += 1;
                    stats.failures.push(SummaryEntry {
                        index: *index,
                        name,
                        detail: message.clone(),
                        manual: *manual,
                    });
                }
            }
        }
        stats
    }

    /// Percentage of attempted updates that succeeded.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.succeeded as f64 * 100.0 / self.attempted as f64;
        rate
    }
}
