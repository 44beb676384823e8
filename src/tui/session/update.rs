//! Event intake: keyboard input and task results.

use crate::tui::App;
use crate::tui::events::intent_for;
use crate::tui::types::{Intent, SessionEvent};
use crossterm::event::Event;

impl App {
    /// Apply a terminal event. Returns true when anything may need redrawing.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => {
                if let Some(intent) = intent_for(self.controller.state(), *key) {
                    self.handle_intent(intent);
                }
                true
            }
            Event::Resize(..) => true,
            _ => false,
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        let effects = self.controller.handle_intent(intent);
        self.dispatch(effects);
    }

    /// Wait for the next task result.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    pub fn apply_event(&mut self, event: SessionEvent) {
        let effects = self.controller.apply(event);
        self.dispatch(effects);
    }

    /// Apply every task result already waiting. Returns true if any arrived.
    pub fn update(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply_event(event);
            changed = true;
        }
        if cfg!(debug_assertions)
            && let Err(violation) = self.controller.validate()
        {
            tracing::error!(%violation, "controller invariant violated");
        }
        changed
    }
}
