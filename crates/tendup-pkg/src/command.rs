//! Shared command helpers for the package managers

use tendup_exec::{CommandExecutor, CommandResult};

use crate::error::PackageError;

/// Prefix a command with sudo when requested
pub(crate) fn with_sudo(use_sudo: bool, cmd: &str) -> String {
    if use_sudo {
        format!("sudo {cmd}")
    } else {
        cmd.to_string()
    }
}

/// Single-quote a value for `sh -c`
pub(crate) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\"'\"'"))
}

/// Run a captured command, failing on a non-zero exit
pub(crate) async fn run_checked(
    executor: &dyn CommandExecutor,
    cmd: &str,
) -> Result<CommandResult, PackageError> {
    let result = executor.run(cmd).await?;
    if !result.success() {
        return Err(PackageError::CommandFailed {
            command: cmd.to_string(),
            status: result.status,
        });
    }
    Ok(result)
}

/// Run an attached command, failing on a non-zero exit
pub(crate) async fn run_attached_checked(
    executor: &dyn CommandExecutor,
    cmd: &str,
) -> Result<CommandResult, PackageError> {
    let result = executor.run_attached(cmd).await?;
    if !result.success() {
        return Err(PackageError::CommandFailed {
            command: cmd.to_string(),
            status: result.status,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_sudo() {
        assert_eq!(with_sudo(true, "apt-get update"), "sudo apt-get update");
        assert_eq!(with_sudo(false, "apt-get update"), "apt-get update");
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/usr/local/go"), "'/usr/local/go'");
        assert_eq!(shell_quote("it's"), "'it'\"'\"'s'");
    }
}
