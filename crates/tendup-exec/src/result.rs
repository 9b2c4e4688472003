//! Result types for command execution

use std::time::Duration;

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status code (0 for success)
    pub status: i32,
    /// stdout output (empty for attached commands)
    pub stdout: String,
    /// stderr output (empty for attached commands)
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Non-empty stdout lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().filter(|line| !line.trim().is_empty())
    }

    /// First stdout line, trimmed
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.lines().next().map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stdout: &str) -> CommandResult {
        CommandResult {
            status: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_lines_skip_blank() {
        let r = result("a\n\n  \nb\n");
        assert_eq!(r.lines().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_first_line() {
        assert_eq!(result("\n  apt 2.7.14 (amd64)\nmore").first_line(), Some("apt 2.7.14 (amd64)"));
        assert_eq!(result("").first_line(), None);
    }
}
