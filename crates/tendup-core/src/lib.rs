//! tendup-core: Detection, reporting and update orchestration
//!
//! Drives the package managers from `tendup-pkg` category by category:
//! system first, then universal packages, then developer toolchains.

pub mod detect;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod sysinfo;

pub use detect::detect_category;
pub use error::CoreError;
pub use orchestrator::{CategoryReport, Event, Orchestrator};
pub use report::StatusReport;
pub use sysinfo::SystemInfo;
