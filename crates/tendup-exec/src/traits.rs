//! Command executor trait

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs shell commands on the local machine
///
/// Package managers only talk to the system through this trait, which keeps
/// their output parsing testable against scripted results.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run a command and capture its stdout and stderr
    async fn run(&self, cmd: &str) -> Result<CommandResult, ExecError>;

    /// Run a command attached to the terminal
    ///
    /// Output streams straight to the user and prompts (sudo, polkit) stay
    /// interactive. Only the exit status is captured.
    async fn run_attached(&self, cmd: &str) -> Result<CommandResult, ExecError>;

    /// Check whether an executable is on the search path
    async fn has_command(&self, name: &str) -> bool {
        self.run(&format!("command -v {name}"))
            .await
            .map(|r| r.success())
            .unwrap_or(false)
    }
}
