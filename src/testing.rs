//! Scripted [`CommandRunner`] for tests.

use crate::process::{CommandOutput, CommandRunner, CommandSpec};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
enum Reply {
    Output(CommandOutput),
    SpawnError,
}

/// Answers commands from a table keyed by command line. Unscripted
/// commands fail to spawn, like a binary that is not installed.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    replies: Mutex<HashMap<String, Vec<Reply>>>,
    delays: HashMap<String, Duration>,
    binaries: HashSet<String>,
    paths: HashSet<PathBuf>,
    env: HashMap<String, String>,
    home: Option<PathBuf>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            home: Some(PathBuf::from("/home/test")),
            ..Self::default()
        }
    }

    /// Successful command printing `stdout`.
    pub fn ok(self, line: &str, stdout: &str) -> Self {
        self.reply(line, 0, stdout, "")
    }

    pub fn fail(self, line: &str, code: i32, stderr: &str) -> Self {
        self.reply(line, code, "", stderr)
    }

    /// Queue a reply. Multiple replies for one line are used in order; the last repeats.
    pub fn reply(self, line: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.push(
            line,
            Reply::Output(CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                timed_out: false,
            }),
        )
    }

    pub fn timeout(self, line: &str) -> Self {
        self.push(
            line,
            Reply::Output(CommandOutput {
                timed_out: true,
                ..CommandOutput::default()
            }),
        )
    }

    pub fn spawn_error(self, line: &str) -> Self {
        self.push(line, Reply::SpawnError)
    }

    pub fn delay(mut self, line: &str, delay: Duration) -> Self {
        self.delays.insert(line.to_string(), delay);
        self
    }

    /// Make `binary` resolvable on PATH.
    pub fn binary(mut self, binary: &str) -> Self {
        self.binaries.insert(binary.to_string());
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.paths.insert(PathBuf::from(path));
        self
    }

    pub fn var(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Command lines run so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(CommandSpec::command_line)
            .collect()
    }

    /// Environment overrides passed to the most recent run of `line`.
    pub fn env_of(&self, line: &str) -> Option<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .rev()
            .find(|spec| spec.command_line() == line)
            .map(|spec| spec.env.clone())
    }

    pub fn count(&self, line: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == line).count()
    }

    fn push(self, line: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(line.to_string())
            .or_default()
            .push(reply);
        self
    }

    fn next_reply(&self, line: &str) -> Option<Reply> {
        let mut replies = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let queue = replies.get_mut(line)?;
        if queue.len() > 1 {
            Some(queue.remove(0))
        } else {
            queue.first().cloned()
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        let line = spec.command_line();
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(spec.clone());

        if let Some(delay) = self.delays.get(&line) {
            tokio::time::sleep(*delay).await;
        }

        match self.next_reply(&line) {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::SpawnError) | None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", spec.program),
            )),
        }
    }

    fn locate(&self, binary: &str) -> Option<PathBuf> {
        self.binaries
            .contains(binary)
            .then(|| PathBuf::from("/usr/local/bin").join(binary))
    }

    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }
}
