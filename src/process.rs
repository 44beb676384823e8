//! External command execution behind a trait seam.
//!
//! Probes and updates never spawn processes directly; they go through a
//! [`CommandRunner`] so that every strategy can be exercised against a
//! scripted runner in tests.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// `sh -c <script>`.
    pub fn shell(script: impl Into<String>, timeout: Duration) -> Self {
        Self::new("sh", timeout).arg("-c").arg(script)
    }

    /// Program and arguments joined by spaces (env overrides omitted).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Captured result of a finished (or timed out) command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when killed by a signal or timed out.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        !self.timed_out && self.code == Some(0)
    }

    /// Trimmed stdout, or stderr when stdout is empty (some tools print versions there).
    #[must_use]
    pub fn primary_text(&self) -> &str {
        let out = self.stdout.trim();
        if out.is_empty() {
            self.stderr.trim()
        } else {
            out
        }
    }

    /// Stdout and stderr combined, for failure diagnostics.
    #[must_use]
    pub fn combined(&self) -> String {
        let out = self.stdout.trim();
        let err = self.stderr.trim();
        match (out.is_empty(), err.is_empty()) {
            (true, true) => String::new(),
            (false, true) => out.to_string(),
            (true, false) => err.to_string(),
            (false, false) => format!("{out}\n{err}"),
        }
    }
}

/// Everything probes and updates need from the host system.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, honoring `spec.timeout`.
    /// `Err` means the process could not be spawned at all.
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput>;

    /// Resolve a binary on `PATH`.
    fn locate(&self, binary: &str) -> Option<PathBuf>;

    fn exists(&self, path: &Path) -> bool;

    fn home_dir(&self) -> Option<PathBuf>;

    fn env_var(&self, key: &str) -> Option<String>;
}

/// Runs real processes with tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        // kill_on_drop reaps the child when the timeout drops the wait future
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        match tokio::time::timeout(spec.timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    timed_out: false,
                })
            }
            Err(_) => {
                tracing::debug!(
                    command = %spec,
                    timeout_ms = spec.timeout.as_millis(),
                    "command timed out"
                );
                Ok(CommandOutput {
                    timed_out: true,
                    ..CommandOutput::default()
                })
            }
        }
    }

    fn locate(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}
