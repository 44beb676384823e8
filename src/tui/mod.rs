//! Interactive dashboard: the session controller and its crossterm front end.

mod controller;
mod events;
mod render;
mod run;
mod session;
mod types;
mod util;

pub use controller::{Controller, SummaryEntry, SummaryStats};
pub use events::intent_for;
pub use run::run;
pub use session::init_tracing;
pub use types::{
    Effect, Intent, Progress, SessionEvent, SessionState, ToolState, ToolStatus, UpdateOutcome,
    resting_status,
};

use crate::probe::Detector;
use crate::update::Executor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Dashboard application: owns the controller and runs the work it asks for.
pub struct App {
    pub controller: Controller,
    pub should_quit: bool,
    detector: Arc<Detector>,
    executor: Arc<Executor>,
    event_tx: mpsc::Sender<SessionEvent>,
    event_rx: mpsc::Receiver<SessionEvent>,
    splash_delay: Duration,
    tick_interval: Duration,
}
