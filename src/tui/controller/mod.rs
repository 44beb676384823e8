//! Session controller: the single writer of all session state.
//!
//! The controller is synchronous. Intents from the keyboard and events from
//! background tasks go in; [`Effect`]s describing work to start come out.
//! Events are keyed by tool index and may arrive in any order.

mod selection;
mod summary;
#[cfg(test)]
mod tests;

pub use summary::{SummaryEntry, SummaryStats};

use crate::catalog::{Catalog, Category, ToolDescriptor};
use crate::probe::{LocalVersion, RemoteVersion};
use crate::tui::types::{
    Effect, Intent, Progress, SessionEvent, SessionState, ToolState, ToolStatus, UpdateOutcome,
};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info};

pub struct Controller {
    catalog: Catalog,
    protected: Vec<Category>,
    tools: Vec<ToolState>,
    state: SessionState,
    cursor: usize,
    selection: BTreeSet<usize>,
    filter: String,
    /// Tools shown in Preview or awaiting Confirm.
    pending: Vec<usize>,
    queue: VecDeque<usize>,
    in_flight: Option<usize>,
    progress: Progress,
    results: Vec<(usize, UpdateOutcome)>,
    summary: Option<SummaryStats>,
    warm_up_requested: bool,
    cache_warm: bool,
    frame: usize,
}

impl Controller {
    /// `protected` adds to the always-protected runtimes; it cannot remove them.
    pub fn new(catalog: Catalog, mut protected: Vec<Category>) -> Self {
        if !protected.contains(&Category::Runtime) {
            protected.push(Category::Runtime);
        }
        let tools = vec![ToolState::default(); catalog.len()];
        Self {
            catalog,
            protected,
            tools,
            state: SessionState::Splash,
            cursor: 0,
            selection: BTreeSet::new(),
            filter: String::new(),
            pending: Vec::new(),
            queue: VecDeque::new(),
            in_flight: None,
            progress: Progress::default(),
            results: Vec::new(),
            summary: None,
            warm_up_requested: false,
            cache_warm: false,
            frame: 0,
        }
    }

    /// Effects to run at session start: every local probe at once.
    pub fn start(&mut self) -> Vec<Effect> {
        (0..self.tools.len()).map(Effect::ProbeLocal).collect()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolState] {
        &self.tools
    }

    #[must_use]
    pub fn tool(&self, index: usize) -> Option<(&ToolDescriptor, &ToolState)> {
        Some((self.catalog.get(index)?, self.tools.get(index)?))
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[must_use]
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    #[must_use]
    pub fn queue(&self) -> &VecDeque<usize> {
        &self.queue
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SummaryStats> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[must_use]
    pub fn is_protected(&self, category: Category) -> bool {
        self.protected.contains(&category)
    }

    /// Tools whose probes have not all answered.
    #[must_use]
    pub fn loading_count(&self) -> usize {
        self.tools.iter().filter(|t| !t.is_resolved()).count()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading_count() > 0
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    pub fn handle_intent(&mut self, intent: Intent) -> Vec<Effect> {
        if intent == Intent::Quit {
            info!(state = self.state.name(), "quit requested");
            return vec![Effect::Quit];
        }

        match self.state {
            SessionState::Splash => {
                self.enter(SessionState::Main);
                Vec::new()
            }
            SessionState::Main => self.main_intent(intent),
            SessionState::Search => {
                self.search_intent(intent);
                Vec::new()
            }
            SessionState::Preview => match intent {
                Intent::Confirm | Intent::Commit => {
                    let targets = self.pending.clone();
                    self.selection.extend(targets.iter().copied());
                    self.guard_and_begin(targets)
                }
                Intent::Cancel => {
                    self.pending.clear();
                    self.enter(SessionState::Main);
                    Vec::new()
                }
                _ => Vec::new(),
            },
            SessionState::Confirm => match intent {
                Intent::Confirm => {
                    let targets = std::mem::take(&mut self.pending);
                    self.begin_updates(targets)
                }
                Intent::Cancel => {
                    self.pending.clear();
                    self.enter(SessionState::Main);
                    Vec::new()
                }
                _ => Vec::new(),
            },
            // Serialized; only a hard quit interrupts.
            SessionState::Updating => Vec::new(),
            SessionState::Summary => {
                self.return_to_main();
                Vec::new()
            }
        }
    }

    fn main_intent(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Up => self.move_cursor(-1),
            Intent::Down => self.move_cursor(1),
            Intent::Top => self.move_to_edge(false),
            Intent::Bottom => self.move_to_edge(true),
            Intent::JumpCategory(category) => self.jump_to_category(category),
            Intent::NextCategory => self.next_category(),
            Intent::Toggle => self.toggle_cursor(),
            Intent::ToggleGroup => self.toggle_group(),
            Intent::ToggleAll => self.toggle_all(),
            Intent::EnterSearch => self.enter(SessionState::Search),
            Intent::Preview => {
                if self.is_loading() {
                    debug!("preview ignored while probes are outstanding");
                    return Vec::new();
                }
                let targets = self.targets();
                if !targets.is_empty() {
                    self.pending = targets;
                    self.enter(SessionState::Preview);
                }
            }
            Intent::Commit | Intent::Confirm => {
                if self.is_loading() {
                    debug!("commit ignored while probes are outstanding");
                    return Vec::new();
                }
                if self.selection.is_empty() && self.cursor_visible() {
                    self.selection.insert(self.cursor);
                }
                let targets: Vec<usize> = self.selection.iter().copied().collect();
                return self.guard_and_begin(targets);
            }
            Intent::Cancel => {
                if !self.filter.is_empty() {
                    self.clear_filter();
                }
            }
            Intent::SearchInput(_) | Intent::SearchBackspace | Intent::Dismiss | Intent::Quit => {}
        }
        Vec::new()
    }

    fn search_intent(&mut self, intent: Intent) {
        match intent {
            Intent::SearchInput(c) => {
                self.filter.push(c);
                self.refilter();
            }
            Intent::SearchBackspace => {
                self.filter.pop();
                self.refilter();
            }
            Intent::Up => self.move_cursor(-1),
            Intent::Down => self.move_cursor(1),
            Intent::Confirm | Intent::Commit => self.enter(SessionState::Main),
            Intent::Cancel => {
                self.clear_filter();
                self.enter(SessionState::Main);
            }
            _ => {}
        }
    }

    /// Selected tools, or the cursor item when nothing is selected.
    fn targets(&self) -> Vec<usize> {
        if self.selection.is_empty() {
            if self.cursor_visible() {
                vec![self.cursor]
            } else {
                Vec::new()
            }
        } else {
            self.selection.iter().copied().collect()
        }
    }

    /// Protected tools always go through Confirm.
    fn guard_and_begin(&mut self, targets: Vec<usize>) -> Vec<Effect> {
        if targets.is_empty() {
            self.enter(SessionState::Main);
            return Vec::new();
        }
        let protected = targets.iter().any(|&i| {
            self.catalog
                .get(i)
                .is_some_and(|t| self.is_protected(t.category))
        });
        if protected {
            self.pending = targets;
            self.enter(SessionState::Confirm);
            Vec::new()
        } else {
            self.pending.clear();
            self.begin_updates(targets)
        }
    }

    fn enter(&mut self, state: SessionState) {
        if self.state != state {
            debug!(from = self.state.name(), to = state.name(), "state transition");
            self.state = state;
        }
    }

    // ------------------------------------------------------------------
    // Update queue
    // ------------------------------------------------------------------

    fn begin_updates(&mut self, targets: Vec<usize>) -> Vec<Effect> {
        if targets.is_empty() {
            self.enter(SessionState::Main);
            return Vec::new();
        }
        info!(count = targets.len(), "update batch started");
        self.queue = targets.into_iter().collect();
        self.progress = Progress {
            total: self.queue.len(),
            completed: 0,
        };
        self.results.clear();
        self.summary = None;
        self.enter(SessionState::Updating);
        self.dispatch_next()
    }

    /// Start the next queued update, or finish the batch.
    fn dispatch_next(&mut self) -> Vec<Effect> {
        let Some(index) = self.queue.pop_front() else {
            self.summary = Some(SummaryStats::build(
                &self.catalog,
                &self.results,
                self.progress.total,
                self.selection.len(),
            ));
            info!(attempted = self.progress.total, "update batch finished");
            self.enter(SessionState::Summary);
            return Vec::new();
        };

        self.in_flight = Some(index);
        let tool = &mut self.tools[index];
        tool.status = ToolStatus::Updating;
        tool.message = None;
        let expected = tool.remote.version().map(str::to_string);
        vec![Effect::Execute { index, expected }]
    }

    fn finish_update(&mut self, index: usize, outcome: UpdateOutcome) -> Vec<Effect> {
        if self.in_flight != Some(index) {
            debug!(index, "ignoring update result for a tool that is not in flight");
            return Vec::new();
        }

        let tool = &mut self.tools[index];
        match &outcome {
            UpdateOutcome::Success { hint, confirmed } => {
                tool.status = ToolStatus::Updated;
                tool.needs_manual = false;
                tool.message = Some(confirmed.version().unwrap_or(hint.as_str()).to_string());
                if !confirmed.is_missing() {
                    tool.local = Some(confirmed.clone());
                }
            }
            UpdateOutcome::Failure { message, manual } => {
                tool.status = ToolStatus::Failed;
                tool.needs_manual = *manual;
                tool.message = Some(message.clone());
            }
        }

        self.results.push((index, outcome));
        self.in_flight = None;
        self.progress.completed += 1;
        self.dispatch_next()
    }

    /// Leave Summary: forget the batch and settle every touched tool.
    fn return_to_main(&mut self) {
        for &(index, _) in &self.results {
            self.tools[index].settle();
        }
        self.results.clear();
        self.selection.clear();
        self.pending.clear();
        self.queue.clear();
        self.in_flight = None;
        self.progress = Progress::default();
        self.summary = None;
        self.enter(SessionState::Main);
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::LocalProbed { index, version } => self.local_probed(index, version),
            SessionEvent::CacheWarmed => {
                self.cache_warm = true;
                self.tools
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.local.is_some() && t.remote == RemoteVersion::Checking)
                    .map(|(i, _)| Effect::ProbeRemote(i))
                    .collect()
            }
            SessionEvent::RemoteProbed { index, version } => {
                if version != RemoteVersion::Checking
                    && let Some(tool) = self.tools.get_mut(index)
                {
                    tool.remote = version;
                    settle_unless_busy(tool);
                }
                Vec::new()
            }
            SessionEvent::UpdateFinished { index, outcome } => self.finish_update(index, outcome),
            SessionEvent::SplashElapsed => {
                if self.state == SessionState::Splash {
                    self.enter(SessionState::Main);
                }
                Vec::new()
            }
            SessionEvent::Tick => {
                self.frame = self.frame.wrapping_add(1);
                Vec::new()
            }
        }
    }

    fn local_probed(&mut self, index: usize, version: LocalVersion) -> Vec<Effect> {
        let Some(tool) = self.tools.get_mut(index) else {
            return Vec::new();
        };
        let missing = version.is_missing();
        tool.local = Some(version);
        if missing {
            tool.remote = RemoteVersion::Unknown;
        }
        settle_unless_busy(tool);

        let mut effects = Vec::new();
        if !self.warm_up_requested {
            self.warm_up_requested = true;
            effects.push(Effect::WarmUp);
        }
        if self.cache_warm && !missing {
            effects.push(Effect::ProbeRemote(index));
        }
        effects
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Check controller invariants; returns the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.tools.len();
        if len != self.catalog.len() {
            return Err(format!(
                "{len} runtime states for {} catalog tools",
                self.catalog.len()
            ));
        }
        if self.cursor >= len {
            return Err(format!("cursor {} out of bounds ({len} tools)", self.cursor));
        }
        if let Some(&i) = self.selection.iter().find(|&&i| i >= len) {
            return Err(format!("selected index {i} out of bounds"));
        }
        if let Some(&i) = self.queue.iter().find(|&&i| i >= len) {
            return Err(format!("queued index {i} out of bounds"));
        }

        let updating = self
            .tools
            .iter()
            .filter(|t| t.status == ToolStatus::Updating)
            .count();
        if updating > 1 {
            return Err(format!("{updating} tools updating at once"));
        }

        if self.state == SessionState::Updating {
            let accounted = self.queue.len() + usize::from(self.in_flight.is_some());
            if accounted != self.progress.remaining() {
                return Err(format!(
                    "queue {} + in flight {} != remaining {}",
                    self.queue.len(),
                    usize::from(self.in_flight.is_some()),
                    self.progress.remaining()
                ));
            }
            if updating != usize::from(self.in_flight.is_some()) {
                return Err("updating status does not match in-flight tool".to_string());
            }
        } else if !self.queue.is_empty() || self.in_flight.is_some() {
            return Err(format!(
                "queue active outside Updating (state {})",
                self.state.name()
            ));
        }

        if self.state == SessionState::Summary && self.summary.is_none() {
            return Err("summary state without summary".to_string());
        }
        Ok(())
    }
}

/// Tools in the middle of an update cycle keep their cycle status.
fn settle_unless_busy(tool: &mut ToolState) {
    if !matches!(
        tool.status,
        ToolStatus::Updating | ToolStatus::Updated | ToolStatus::Failed
    ) {
        tool.settle();
    }
}
