//! tendup
//!
//! Checks for and applies updates across APT, Flatpak, rustup/Cargo and Go,
//! in that order.

use std::process::ExitCode;
use std::sync::Arc;

use color_eyre::Result;
use tendup_core::{CoreError, Orchestrator};
use tendup_exec::LocalExecutor;
use tendup_pkg::Category;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod console;
mod factory;

use cli::Action;
use config::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let action = Action::parse_from(std::env::args_os());
    if let Some(code) = answer_without_managers(&action) {
        return Ok(code);
    }

    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&settings.log_filter)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    tracing::debug!(?action, "dispatching");

    let orchestrator =
        factory::build_orchestrator(&settings, Arc::new(LocalExecutor::new())).await;
    Ok(exit_code(run(&action, &orchestrator).await))
}

/// Handle actions that never touch a package manager
///
/// Returns `None` when the action needs the orchestrator.
fn answer_without_managers(action: &Action) -> Option<ExitCode> {
    match action {
        Action::Help => {
            print!("{}", cli::usage());
            Some(ExitCode::SUCCESS)
        }
        // Invalid input is reported but does not fail the process
        Action::Invalid(input) => {
            console::err(format!("invalid option '{input}'"));
            eprintln!("run `tendup --help` for usage");
            Some(ExitCode::SUCCESS)
        }
        _ => None,
    }
}

fn exit_code(result: Result<(), CoreError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console::err(&e);
            console::err("check the output above for details");
            ExitCode::FAILURE
        }
    }
}

async fn run(action: &Action, orchestrator: &Orchestrator) -> Result<(), CoreError> {
    let mut on_event = console::event;

    match action {
        Action::CheckUpdates => {
            console::report(&orchestrator.status().await);
            Ok(())
        }
        Action::System => orchestrator
            .apply(Category::System, &mut on_event)
            .await
            .map(drop),
        Action::Universal => orchestrator
            .apply(Category::Universal, &mut on_event)
            .await
            .map(drop),
        Action::Toolchain => orchestrator
            .apply(Category::Toolchain, &mut on_event)
            .await
            .map(drop),
        Action::Full => orchestrator.full(&mut on_event).await,
        Action::Help | Action::Invalid(_) => Ok(()),
    }
}
