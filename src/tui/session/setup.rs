//! App initialization and logging setup.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::probe::Detector;
use crate::process::CommandRunner;
use crate::tui::{App, Controller};
use crate::update::Executor;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Room for one result per tool plus timer events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

impl App {
    pub fn new(config: &Config, catalog: Catalog, runner: Arc<dyn CommandRunner>) -> Self {
        let detector = Detector::new(runner.clone(), config.probe_timeout());
        let executor = Executor::with_builtins(runner, config.update_timeout());
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tracing::info!(
            tools = catalog.len(),
            probe_timeout_secs = config.probe_timeout().as_secs(),
            update_timeout_secs = config.update_timeout().as_secs(),
            "session created"
        );

        Self {
            controller: Controller::new(catalog, config.protected_categories.clone()),
            should_quit: false,
            detector: Arc::new(detector),
            executor: Arc::new(executor),
            event_tx,
            event_rx,
            splash_delay: config.splash_delay(),
            tick_interval: config.tick_interval(),
        }
    }
}

/// Initialize logging.
///
/// The dashboard owns the terminal, so logs only go to a file: `log_file`, or
/// the path in `SPARK_LOG`. Without either, `RUST_LOG` enables stderr logging
/// for non-interactive commands.
pub fn init_tracing(log_file: Option<PathBuf>) {
    use tracing_subscriber::prelude::*;

    let log_file = log_file.or_else(|| {
        std::env::var("SPARK_LOG")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });

    if let Some(path) = log_file {
        match std::fs::File::create(&path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false);
                let filter = tracing_subscriber::EnvFilter::new("spark=debug");
                let _ = tracing_subscriber::registry()
                    .with(file_layer.with_filter(filter))
                    .try_init();
            }
            Err(err) => {
                eprintln!("Failed to create log file {}: {err}", path.display());
            }
        }
    } else if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }
}
