//! Filesweep - walk a directory tree and list, delete, or archive matching files

pub mod actions;
pub mod config;
pub mod error;
pub mod filter;
pub mod walker;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use actions::{Action, ArchiveAction, AuditLog, DeleteAction, Effect, ListAction};
pub use config::{Mode, TraversalConfig};
pub use error::{Error, Result};
pub use filter::{extension_of, should_exclude};
pub use walker::{Entry, Visit, WalkSummary, Walker, run};
