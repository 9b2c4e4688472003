//! Package manager traits

use async_trait::async_trait;

use crate::error::PackageError;
use crate::types::{ApplyOutcome, ManagerKind, UpdateInfo};

/// A package manager that can report and apply its own updates
///
/// Each implementation owns the text parsing for one tool. Callers only see
/// [`UpdateInfo`] and [`ApplyOutcome`], so a manager can move to a structured
/// output mode without touching orchestration.
#[async_trait]
pub trait Updater: Send + Sync {
    /// Which manager this is
    fn kind(&self) -> ManagerKind;

    /// Whether the manager's executable is on the search path
    async fn is_available(&self) -> bool;

    /// Query pending updates without changing installed packages
    async fn check_updates(&self) -> Result<UpdateInfo, PackageError>;

    /// Re-check and apply pending updates
    async fn apply(&self) -> Result<ApplyOutcome, PackageError>;

    /// Version string of the manager itself, if it reports one
    async fn version(&self) -> Option<String> {
        None
    }
}
