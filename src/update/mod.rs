//! Update execution: one strategy per update method.
//!
//! Every strategy either succeeds or returns an [`UpdateError`] whose
//! `Display` is the diagnostic shown to the operator. Nothing is rolled back
//! after a failure.

mod strategies;

pub use strategies::{
    BrewUpgrade, CaskUpgrade, InstallScriptRerun, ManualNotice, NpmInstallLatest, OmzUpgrade,
};

use crate::catalog::{ToolDescriptor, UpdateMethod};
use crate::process::{CommandOutput, CommandRunner, CommandSpec};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Hint reported on success when the new version is not known ahead of time.
pub const LATEST_HINT: &str = "latest";

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("manual update required ({0})")]
    ManualOnly(String),

    #[error("manual update required (not manager-tracked)")]
    NotManaged,

    #[error("install root not found: {}", .0.display())]
    NotInstalled(PathBuf),

    #[error("`{command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {}s", .after.as_secs())]
    TimedOut { command: String, after: Duration },

    #[error("no update strategy registered for method `{0}`")]
    Unsupported(String),
}

impl UpdateError {
    /// Failures that need a human rather than a retry.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::ManualOnly(_) | Self::NotManaged)
    }
}

/// What a strategy gets to work with.
pub struct UpdateContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub timeout: Duration,
}

impl UpdateContext<'_> {
    /// Run `spec` and require a zero exit.
    pub async fn run_checked(&self, spec: &CommandSpec) -> Result<CommandOutput, UpdateError> {
        let command = spec.command_line();
        let output = self
            .runner
            .run(spec)
            .await
            .map_err(|source| UpdateError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.timed_out {
            return Err(UpdateError::TimedOut {
                command,
                after: spec.timeout,
            });
        }
        if !output.success() {
            let mut text = output.combined();
            if text.is_empty() {
                text = output
                    .code
                    .map_or_else(|| "terminated".to_string(), |c| format!("exit status {c}"));
            }
            return Err(UpdateError::CommandFailed {
                command,
                output: text,
            });
        }
        Ok(output)
    }

    /// Command builder preset with the update timeout.
    #[must_use]
    pub fn command(&self, program: &str) -> CommandSpec {
        CommandSpec::new(program, self.timeout)
    }
}

/// A way of updating tools that share an update method.
#[async_trait]
pub trait UpdateStrategy: Send + Sync {
    /// Method tag this strategy handles, see [`UpdateMethod::tag`].
    fn method(&self) -> &'static str;

    async fn apply(
        &self,
        ctx: &UpdateContext<'_>,
        tool: &ToolDescriptor,
    ) -> Result<(), UpdateError>;
}

/// Dispatches updates to the strategy registered for each method tag.
pub struct Executor {
    strategies: HashMap<&'static str, Box<dyn UpdateStrategy>>,
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl Executor {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self {
            strategies: HashMap::new(),
            runner,
            timeout,
        }
    }

    pub fn register(&mut self, strategy: Box<dyn UpdateStrategy>) {
        self.strategies.insert(strategy.method(), strategy);
    }

    /// Executor with a strategy for every [`UpdateMethod`].
    pub fn with_builtins(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        let mut executor = Self::new(runner, timeout);
        executor.register(Box::new(BrewUpgrade));
        executor.register(Box::new(CaskUpgrade));
        executor.register(Box::new(NpmInstallLatest::registry()));
        executor.register(Box::new(NpmInstallLatest::system()));
        executor.register(Box::new(OmzUpgrade));
        executor.register(Box::new(InstallScriptRerun));
        executor.register(Box::new(ManualNotice));
        executor
    }

    #[must_use]
    pub fn supports(&self, method: &UpdateMethod) -> bool {
        self.strategies.contains_key(method.tag())
    }

    /// Update `tool`. On success returns a non-empty version hint: `expected`
    /// when the latest version is already known, otherwise [`LATEST_HINT`].
    pub async fn execute(
        &self,
        tool: &ToolDescriptor,
        expected: Option<&str>,
    ) -> Result<String, UpdateError> {
        let strategy = self
            .strategies
            .get(tool.method.tag())
            .ok_or_else(|| UpdateError::Unsupported(tool.method.tag().to_string()))?;

        let ctx = UpdateContext {
            runner: self.runner.as_ref(),
            timeout: self.timeout,
        };
        let started = Instant::now();
        tracing::info!(tool = %tool.id, method = tool.method.tag(), "update started");

        match strategy.apply(&ctx, tool).await {
            Ok(()) => {
                tracing::info!(
                    tool = %tool.id,
                    elapsed_ms = started.elapsed().as_millis(),
                    "update succeeded"
                );
                Ok(expected
                    .filter(|v| !v.is_empty())
                    .unwrap_or(LATEST_HINT)
                    .to_string())
            }
            Err(e) => {
                tracing::warn!(
                    tool = %tool.id,
                    elapsed_ms = started.elapsed().as_millis(),
                    error = %e,
                    "update failed"
                );
                Err(e)
            }
        }
    }
}
