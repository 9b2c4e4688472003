//! tendup-exec: Command execution abstraction
//!
//! Provides the executor trait used by every package manager and a local
//! implementation backed by `tokio::process`

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandResult;
pub use traits::CommandExecutor;
