//! tendup-pkg: Package manager abstraction
//!
//! One [`Updater`] per package manager: APT for the system, Flatpak for
//! universal packages, rustup/Cargo and Go for developer toolchains.

pub mod apt;
mod command;
pub mod error;
pub mod flatpak;
pub mod golang;
pub mod release;
pub mod rustup;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use apt::AptManager;
pub use error::PackageError;
pub use flatpak::FlatpakManager;
pub use golang::{GoManager, GoPlatform};
pub use release::{GoReleaseFeed, ReleaseFeed};
pub use rustup::RustupManager;
pub use traits::Updater;
pub use types::{ApplyOutcome, Category, ManagerKind, PendingUpdates, UpdateInfo, UpgradablePackage};
