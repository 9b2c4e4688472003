//! Core error types for tendup-core

use tendup_pkg::{ManagerKind, PackageError};
use thiserror::Error;

/// Errors that stop an update run
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// A package manager failed while applying updates
    #[error("{manager} update failed: {source}")]
    Apply {
        /// Manager that failed
        manager: ManagerKind,
        /// Underlying failure
        #[source]
        source: PackageError,
    },
}

impl CoreError {
    /// Manager responsible for the failure
    #[must_use]
    pub fn manager(&self) -> ManagerKind {
        match self {
            CoreError::Apply { manager, .. } => *manager,
        }
    }
}
