//! Background tasks: probes, cache warm-up, updates and timers.
//!
//! Every task reports back through the event channel; none touches
//! controller state directly.

use crate::probe::LocalVersion;
use crate::tui::App;
use crate::tui::types::{Effect, SessionEvent, UpdateOutcome};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

impl App {
    /// Kick off the session: timers plus every local probe.
    pub fn start(&mut self) {
        if self.splash_delay.is_zero() {
            self.controller.apply(SessionEvent::SplashElapsed);
        } else {
            spawn_splash_timer(self.event_tx.clone(), self.splash_delay);
        }
        spawn_ticker(self.event_tx.clone(), self.tick_interval);

        let effects = self.controller.start();
        self.dispatch(effects);
    }

    /// Start the work described by `effects`.
    pub(in crate::tui) fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ProbeLocal(index) => self.spawn_local_probe(index),
                Effect::WarmUp => self.spawn_warm_up(),
                Effect::ProbeRemote(index) => self.spawn_remote_probe(index),
                Effect::Execute { index, expected } => self.spawn_update(index, expected),
                Effect::Quit => self.should_quit = true,
            }
        }
    }

    fn spawn_local_probe(&self, index: usize) {
        let Some(tool) = self.controller.catalog().get(index).cloned() else {
            return;
        };
        let detector = self.detector.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let version = detector.local_version(&tool).await;
            let _ = tx.send(SessionEvent::LocalProbed { index, version }).await;
        });
    }

    fn spawn_warm_up(&self) {
        let detector = self.detector.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            detector.warm_up().await;
            let _ = tx.send(SessionEvent::CacheWarmed).await;
        });
    }

    fn spawn_remote_probe(&self, index: usize) {
        let Some((tool, state)) = self.controller.tool(index) else {
            return;
        };
        let tool = tool.clone();
        let local = state.local.clone().unwrap_or(LocalVersion::Missing);
        let detector = self.detector.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let version = detector.remote_version(&tool, &local);
            let _ = tx.send(SessionEvent::RemoteProbed { index, version }).await;
        });
    }

    /// Run one update, then re-probe the installed version on success.
    fn spawn_update(&self, index: usize, expected: Option<String>) {
        let Some(tool) = self.controller.catalog().get(index).cloned() else {
            warn!(index, "update requested for unknown tool");
            return;
        };
        let detector = self.detector.clone();
        let executor = self.executor.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = match executor.execute(&tool, expected.as_deref()).await {
                Ok(hint) => {
                    let confirmed = detector.local_version(&tool).await;
                    debug!(tool = %tool.id, %confirmed, "re-probed after update");
                    UpdateOutcome::Success { hint, confirmed }
                }
                Err(e) => UpdateOutcome::Failure {
                    message: e.to_string(),
                    manual: e.is_manual(),
                },
            };
            let _ = tx
                .send(SessionEvent::UpdateFinished { index, outcome })
                .await;
        });
    }
}

fn spawn_splash_timer(tx: mpsc::Sender<SessionEvent>, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(SessionEvent::SplashElapsed).await;
    });
}

/// Free-running cosmetic timer; stops when the app goes away.
fn spawn_ticker(tx: mpsc::Sender<SessionEvent>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            // try_send: a full channel just drops a frame.
            match tx.try_send(SessionEvent::Tick) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => {}
                Err(mpsc::error::TrySendError::Closed(_)) => break,
            }
        }
    });
}
