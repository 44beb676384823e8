//! Controller type definitions: states, statuses, events and effects.

use crate::catalog::Category;
use crate::probe::{LocalVersion, RemoteVersion};
use serde::Serialize;
use std::fmt;

/// Spinner frames advanced by the cosmetic tick.
pub(crate) const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Splash,
    Main,
    Search,
    Preview,
    Confirm,
    Updating,
    Summary,
}

impl SessionState {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Splash => "SPLASH",
            Self::Main => "MAIN",
            Self::Search => "SEARCH",
            Self::Preview => "PREVIEW",
            Self::Confirm => "CONFIRM",
            Self::Updating => "UPDATING",
            Self::Summary => "SUMMARY",
        }
    }
}

/// Per-tool status shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    #[default]
    Checking,
    Installed,
    Outdated,
    Missing,
    /// Installed, but the version cannot be read.
    Unmanaged,
    /// Needs a human: no automated update path.
    ManualCheck,
    Updating,
    Updated,
    Failed,
}

impl ToolStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "CHECKING",
            Self::Installed => "OK",
            Self::Outdated => "UPDATE",
            Self::Missing => "MISSING",
            Self::Unmanaged => "UNMANAGED",
            Self::ManualCheck => "MANUAL",
            Self::Updating => "UPDATING",
            Self::Updated => "UPDATED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resting status derived from probe results.
///
/// `None` for `local` means the local probe has not answered yet.
#[must_use]
pub fn resting_status(local: Option<&LocalVersion>, remote: &RemoteVersion) -> ToolStatus {
    match local {
        None => ToolStatus::Checking,
        Some(LocalVersion::Missing) => ToolStatus::Missing,
        Some(LocalVersion::Detected) => ToolStatus::Unmanaged,
        Some(LocalVersion::Version(local)) => match remote.version() {
            Some(remote) if remote != local => ToolStatus::Outdated,
            _ => ToolStatus::Installed,
        },
    }
}

/// Mutable runtime state of one catalog tool. Only the controller writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolState {
    pub status: ToolStatus,
    pub local: Option<LocalVersion>,
    pub remote: RemoteVersion,
    /// Diagnostic from the last failed update, or the confirmed version after success.
    pub message: Option<String>,
    /// Last update failed in a way only a human can fix.
    pub needs_manual: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            status: ToolStatus::Checking,
            local: None,
            remote: RemoteVersion::Checking,
            message: None,
            needs_manual: false,
        }
    }
}

impl ToolState {
    /// Recompute status from the current versions.
    pub fn settle(&mut self) {
        let status = resting_status(self.local.as_ref(), &self.remote);
        self.status = if self.needs_manual && status != ToolStatus::Missing {
            ToolStatus::ManualCheck
        } else {
            status
        };
    }

    /// Both probes have answered.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.local.is_some() && self.remote != RemoteVersion::Checking
    }

    #[must_use]
    pub fn local_label(&self) -> String {
        self.local
            .as_ref()
            .map_or_else(|| "...".to_string(), ToString::to_string)
    }
}

/// User intents delivered by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Up,
    Down,
    Top,
    Bottom,
    JumpCategory(Category),
    NextCategory,
    Toggle,
    ToggleGroup,
    ToggleAll,
    EnterSearch,
    SearchInput(char),
    SearchBackspace,
    Preview,
    Commit,
    /// Enter / yes in the current context.
    Confirm,
    /// Esc / no in the current context.
    Cancel,
    /// Any other key; dismisses splash and summary.
    Dismiss,
    Quit,
}

/// Results delivered back from asynchronous tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LocalProbed {
        index: usize,
        version: LocalVersion,
    },
    CacheWarmed,
    RemoteProbed {
        index: usize,
        version: RemoteVersion,
    },
    UpdateFinished {
        index: usize,
        outcome: UpdateOutcome,
    },
    SplashElapsed,
    Tick,
}

/// Result of one update, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Success {
        hint: String,
        /// Local version re-probed after the update.
        confirmed: LocalVersion,
    },
    Failure {
        message: String,
        manual: bool,
    },
}

/// Work the controller asks the runtime to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ProbeLocal(usize),
    WarmUp,
    ProbeRemote(usize),
    Execute {
        index: usize,
        expected: Option<String>,
    },
    Quit,
}

/// Update batch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
}

impl Progress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Completion ratio in `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.completed as f64 / self.total as f64;
        ratio.min(1.0)
    }
}
