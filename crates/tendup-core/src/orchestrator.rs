//! Category appliers and the full update run

use std::path::PathBuf;
use std::sync::Arc;

use tendup_pkg::{ApplyOutcome, Category, ManagerKind, Updater};
use tracing::{debug, info, instrument, warn};

use crate::detect::detect_category;
use crate::error::CoreError;
use crate::report::StatusReport;
use crate::sysinfo::{DEFAULT_OS_RELEASE, SystemInfo};

/// Categories in the order a full run applies them
pub const APPLY_ORDER: [Category; 3] = [Category::System, Category::Universal, Category::Toolchain];

/// Progress notifications emitted while running
#[derive(Debug)]
pub enum Event<'a> {
    /// Detection finished
    Report(&'a StatusReport),
    /// A manager is about to apply its updates
    Started(ManagerKind),
    /// A manager finished applying its updates
    Finished(ManagerKind, &'a ApplyOutcome),
    /// No manager of this category is installed
    NoManagers(Category),
}

/// Outcome of applying one category
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// Category that was applied
    pub category: Category,
    /// One entry per installed manager, in registration order
    pub results: Vec<(ManagerKind, ApplyOutcome)>,
}

impl CategoryReport {
    /// Whether no manager of the category was installed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Runs detection and updates over a fixed set of package managers
pub struct Orchestrator {
    updaters: Vec<Arc<dyn Updater>>,
    os_release: PathBuf,
}

impl Orchestrator {
    /// Create an orchestrator over `updaters`
    ///
    /// Within a category, managers run in the order given here.
    pub fn new(updaters: Vec<Arc<dyn Updater>>) -> Self {
        Self {
            updaters,
            os_release: PathBuf::from(DEFAULT_OS_RELEASE),
        }
    }

    /// Read OS identity from a different os-release file
    #[must_use]
    pub fn with_os_release(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release = path.into();
        self
    }

    fn in_category(&self, category: Category) -> Vec<Arc<dyn Updater>> {
        self.updaters
            .iter()
            .filter(|u| u.kind().category() == category)
            .cloned()
            .collect()
    }

    /// Detect pending updates in every category
    #[instrument(skip(self))]
    pub async fn status(&self) -> StatusReport {
        let system = SystemInfo::load(&self.os_release).await;

        let mut package_manager = None;
        let mut system_updates = 0;
        for updater in self.in_category(Category::System) {
            if !updater.is_available().await {
                continue;
            }
            package_manager = updater.version().await;
            match updater.check_updates().await {
                Ok(info) => system_updates = info.pending_count(),
                Err(e) => warn!(manager = %updater.kind(), error = %e, "update check failed"),
            }
            break;
        }

        let universal = detect_category(&self.in_category(Category::Universal)).await;
        let toolchain = detect_category(&self.in_category(Category::Toolchain)).await;

        StatusReport {
            system,
            package_manager,
            system_updates,
            universal,
            toolchain,
        }
    }

    /// Apply updates for one category
    ///
    /// Stops at the first manager that fails. Missing managers are skipped,
    /// and a category with none installed succeeds with an empty report.
    #[instrument(skip(self, on_event))]
    pub async fn apply(
        &self,
        category: Category,
        on_event: &mut dyn FnMut(Event<'_>),
    ) -> Result<CategoryReport, CoreError> {
        let mut report = CategoryReport {
            category,
            results: Vec::new(),
        };

        for updater in self.in_category(category) {
            let manager = updater.kind();
            if !updater.is_available().await {
                debug!(%manager, "not installed, skipping");
                continue;
            }

            on_event(Event::Started(manager));
            let outcome = updater
                .apply()
                .await
                .map_err(|source| CoreError::Apply { manager, source })?;
            on_event(Event::Finished(manager, &outcome));
            report.results.push((manager, outcome));
        }

        if report.is_empty() {
            on_event(Event::NoManagers(category));
        }
        info!(%category, managers = report.results.len(), "category applied");
        Ok(report)
    }

    /// Detect and report, then apply every category in order
    ///
    /// The first failing category ends the run.
    #[instrument(skip(self, on_event))]
    pub async fn full(&self, on_event: &mut dyn FnMut(Event<'_>)) -> Result<(), CoreError> {
        let report = self.status().await;
        on_event(Event::Report(&report));

        for category in APPLY_ORDER {
            self.apply(category, on_event).await?;
        }
        Ok(())
    }
}
