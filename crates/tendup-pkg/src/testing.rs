//! Scripted executor for package manager tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tendup_exec::{CommandExecutor, CommandResult, ExecError};

/// Executor that answers from a fixed script and records every command
///
/// Unscripted commands exit with status 127, like a missing binary.
#[derive(Default)]
pub(crate) struct ScriptedExecutor {
    responses: HashMap<String, (i32, String)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `command -v <name>` succeed
    pub(crate) fn tool(self, name: &str) -> Self {
        let path = format!("/usr/bin/{name}");
        self.ok(&format!("command -v {name}"), &path)
    }

    pub(crate) fn ok(self, cmd: &str, stdout: &str) -> Self {
        self.respond(cmd, 0, stdout)
    }

    pub(crate) fn fail(self, cmd: &str, status: i32) -> Self {
        self.respond(cmd, status, "")
    }

    pub(crate) fn respond(mut self, cmd: &str, status: i32, stdout: &str) -> Self {
        self.responses
            .insert(cmd.to_string(), (status, stdout.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn ran(&self, cmd: &str) -> bool {
        self.calls().iter().any(|c| c == cmd)
    }

    fn answer(&self, cmd: &str) -> CommandResult {
        self.calls.lock().unwrap().push(cmd.to_string());
        let (status, stdout) = self
            .responses
            .get(cmd)
            .cloned()
            .unwrap_or((127, String::new()));
        CommandResult {
            status,
            stdout,
            stderr: String::new(),
            duration: Duration::from_millis(1),
        }
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        Ok(self.answer(cmd))
    }

    async fn run_attached(&self, cmd: &str) -> Result<CommandResult, ExecError> {
        Ok(self.answer(cmd))
    }
}
