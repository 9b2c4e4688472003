//! Command-line dispatch
//!
//! Exactly one action per invocation. Input that does not parse is reported
//! and turned into [`Action::Invalid`] rather than a clap exit.

use std::ffi::OsString;

use clap::{ArgGroup, CommandFactory, Parser};

const ENV_HELP: &str = "\
Environment:
  TENDUP_LOG              tracing filter for diagnostics on stderr [default: warn]
  TENDUP_SUDO             force sudo on or off (1/0, true/false) [default: auto]
  TENDUP_OS_RELEASE       os-release file to read [default: /etc/os-release]
  TENDUP_GO_VERSION_URL   latest Go version endpoint
  TENDUP_GO_DOWNLOAD_URL  base URL for Go release archives

Without an option, tendup runs --full.";

/// Update APT, Flatpak, Rust and Go from one command
#[derive(Parser, Debug)]
#[command(name = "tendup", disable_help_flag = true, after_help = ENV_HELP)]
#[command(group(ArgGroup::new("action").multiple(false)))]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long, group = "action")]
    help: bool,

    /// Show pending updates without applying them
    #[arg(short = 'c', long, group = "action")]
    check_updates: bool,

    /// Apply system (APT) updates
    #[arg(short = 's', long, group = "action")]
    system: bool,

    /// Apply universal (Flatpak) updates
    #[arg(short = 'u', long, group = "action")]
    universal: bool,

    /// Apply toolchain (Rust, Go) updates
    #[arg(short = 't', long, group = "action")]
    toolchain: bool,

    /// Check, then apply system, universal and toolchain updates in order
    #[arg(short = 'f', long, group = "action")]
    full: bool,
}

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    CheckUpdates,
    System,
    Universal,
    Toolchain,
    Full,
    /// Unrecognized input, as typed
    Invalid(String),
}

impl Action {
    /// Parse process arguments, program name first
    pub fn parse_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        match Cli::try_parse_from(&args) {
            Ok(cli) => Self::from_cli(&cli),
            Err(_) => {
                let input = args
                    .iter()
                    .skip(1)
                    .map(|arg| arg.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(" ");
                Action::Invalid(input)
            }
        }
    }

    fn from_cli(cli: &Cli) -> Self {
        if cli.help {
            Action::Help
        } else if cli.check_updates {
            Action::CheckUpdates
        } else if cli.system {
            Action::System
        } else if cli.universal {
            Action::Universal
        } else if cli.toolchain {
            Action::Toolchain
        } else {
            Action::Full
        }
    }
}

/// Rendered usage text
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
