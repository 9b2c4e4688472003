//! User-facing output
//!
//! Info goes to stdout, warnings and errors to stderr. `colored` honors
//! `NO_COLOR` and `CLICOLOR_FORCE`.

use std::fmt::Display;

use colored::Colorize;
use tendup_core::{Event, StatusReport};
use tendup_pkg::ApplyOutcome;

pub fn info(msg: impl Display) {
    println!("{} {msg}", "[info]".green().bold());
}

pub fn warn(msg: impl Display) {
    eprintln!("{} {msg}", "[warn]".yellow().bold());
}

pub fn err(msg: impl Display) {
    eprintln!("{} {msg}", "[err]".red().bold());
}

pub fn report(report: &StatusReport) {
    println!("{}", "Update status".bold());
    println!("{report}");
}

/// Print orchestrator progress
pub fn event(event: Event<'_>) {
    match event {
        Event::Report(status) => report(status),
        Event::Started(manager) => info(format!("updating {manager}")),
        Event::Finished(manager, ApplyOutcome::Updated { summary }) => {
            info(format!("{manager}: {summary}"));
        }
        Event::Finished(manager, ApplyOutcome::UpToDate) => {
            info(format!("{manager}: already up to date"));
        }
        Event::Finished(manager, ApplyOutcome::Skipped { reason }) => {
            warn(format!("{manager}: skipped, {reason}"));
        }
        Event::NoManagers(category) => {
            warn(format!("no {category} package manager found, skipping"));
        }
    }
}
