//! Actions applied to files that pass the filter
//!
//! Each action is a strategy implementing [`Action`]. The walker is generic
//! over the strategy, so the mode is resolved once when the walker is built
//! rather than re-checked for every entry.

mod archive;
mod delete;
mod list;

pub use archive::{ArchiveAction, ArchiveThenDelete, archive_file, archive_target};
pub use delete::{AUDIT_PREFIX, AuditLog, DeleteAction, delete_file};
pub use list::{ListAction, list_file};

use crate::error::Result;
use crate::walker::Entry;

/// Side effect an action had on a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Listed,
    Deleted,
    Archived,
    ArchivedAndDeleted,
}

/// Strategy invoked for every included file.
///
/// Returning an error aborts the whole walk.
pub trait Action {
    fn apply(&mut self, entry: &Entry) -> Result<Effect>;
}

impl<A: Action + ?Sized> Action for &mut A {
    fn apply(&mut self, entry: &Entry) -> Result<Effect> {
        (**self).apply(entry)
    }
}
