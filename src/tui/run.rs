//! TUI main loop and terminal management.
//!
//! Terminal events, task results and the frame timer are multiplexed with
//! `select!`; every wake-up drains pending results and redraws the snapshot.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::process::CommandRunner;
use crate::tui::App;
use crate::tui::render;
use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::EventStream,
    execute,
    terminal::{
        self, BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
};
use futures::StreamExt;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;
use std::time::Duration;

/// Redraw interval when nothing else wakes the loop.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Guard that restores the original panic hook on drop.
struct PanicHookGuard {
    original_hook: Arc<dyn Fn(&std::panic::PanicHookInfo) + Send + Sync + 'static>,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        let original_hook = Arc::clone(&self.original_hook);
        std::panic::set_hook(Box::new(move |info| {
            (original_hook)(info);
        }));
    }
}

fn setup_terminal(stdout: &mut io::Stdout) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, Hide)?;
    Ok(())
}

fn cleanup_terminal(stdout: &mut io::Stdout) -> Result<()> {
    // Safety net if an error interrupted a frame.
    let _ = execute!(stdout, EndSynchronizedUpdate);
    execute!(stdout, LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}

/// Main entry point for the dashboard.
///
/// Owns the terminal until the operator quits; the terminal is restored on
/// every exit path, including panics.
pub async fn run(config: Config, catalog: Catalog, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let original_hook: Arc<dyn Fn(&std::panic::PanicHookInfo) + Send + Sync> =
        Arc::from(std::panic::take_hook());
    let hook_for_panic = Arc::clone(&original_hook);
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        (hook_for_panic)(info);
    }));
    let _panic_guard = PanicHookGuard { original_hook };

    let mut stdout = io::stdout();
    setup_terminal(&mut stdout)?;

    let mut app = App::new(&config, catalog, runner);
    app.start();
    let result = event_loop(&mut app, &mut stdout).await;

    cleanup_terminal(&mut stdout)?;
    if let Some(stats) = app.controller.summary() {
        println!(
            "spark: {} updated, {} failed, {} skipped",
            stats.succeeded, stats.failed, stats.skipped
        );
    }
    result
}

async fn event_loop(app: &mut App, stdout: &mut io::Stdout) -> Result<()> {
    let mut events = EventStream::new();
    let mut frame = tokio::time::interval(FRAME_INTERVAL);
    frame.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let debug_events = std::env::var("SPARK_DEBUG_EVENTS").is_ok();

    loop {
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    if debug_events {
                        tracing::debug!(?event, "terminal event");
                    }
                    app.handle_event(&event);
                }
                Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                None => break,
            },
            Some(event) = app.next_event() => app.apply_event(event),
            _ = frame.tick() => {}
        }
        app.update();

        let (width, height) = terminal::size()?;
        let mut out = BufWriter::new(&mut *stdout);
        execute!(out, BeginSynchronizedUpdate)?;
        render::draw(&mut out, &app.controller, width, height)?;
        execute!(out, EndSynchronizedUpdate)?;
        out.flush()?;

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
