//! Depth-first walk that filters entries and dispatches them to an action

use std::fs::{self, Metadata};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::actions::{Action, ArchiveAction, AuditLog, DeleteAction, Effect, ListAction};
use crate::config::{Mode, TraversalConfig};
use crate::error::{Error, Result};
use crate::filter::should_exclude;

/// A single filesystem node seen during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The root exactly as given, or a child path built from the cleaned root.
    /// Relative roots give relative paths, and a root of `.` gives bare names.
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

impl Entry {
    /// Build an entry from `lstat` metadata. Symlinks are never directories.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        Self {
            path,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        }
    }
}

/// Outcome of visiting one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Excluded by the filter; nothing was done.
    Filtered,
    /// Included, and the action ran.
    Applied(Effect),
}

/// Counters for a completed walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Every entry seen, directories and the root included.
    pub visited: usize,
    pub filtered: usize,
    pub listed: usize,
    pub archived: usize,
    pub deleted: usize,
}

impl WalkSummary {
    fn record(&mut self, visit: Visit) {
        self.visited += 1;
        match visit {
            Visit::Filtered => self.filtered += 1,
            Visit::Applied(Effect::Listed) => self.listed += 1,
            Visit::Applied(Effect::Deleted) => self.deleted += 1,
            Visit::Applied(Effect::Archived) => self.archived += 1,
            Visit::Applied(Effect::ArchivedAndDeleted) => {
                self.archived += 1;
                self.deleted += 1;
            }
        }
    }
}

/// Walks a tree in lexical pre-order and applies `A` to each included file.
///
/// Siblings are visited sorted by name. Symlinks are not followed. The
/// first error from reading the tree or from the action stops the walk.
pub struct Walker<'c, A: Action> {
    config: &'c TraversalConfig,
    action: A,
    summary: WalkSummary,
}

impl<'c, A: Action> Walker<'c, A> {
    pub fn new(config: &'c TraversalConfig, action: A) -> Self {
        Self {
            config,
            action,
            summary: WalkSummary::default(),
        }
    }

    /// Walk everything under `root`, `root` itself included.
    pub fn walk(mut self, root: &Path) -> Result<WalkSummary> {
        self.walk_path(root.to_path_buf())?;
        Ok(self.summary)
    }

    /// Filter one entry and, if it is included, apply the action.
    pub fn visit(&mut self, entry: &Entry) -> Result<Visit> {
        if should_exclude(
            &entry.path,
            self.config.extension_filter(),
            self.config.min_size,
            entry.is_dir,
            entry.size,
        ) {
            trace!(path = %entry.path.display(), "filtered out");
            return Ok(Visit::Filtered);
        }

        let effect = self.action.apply(entry)?;
        Ok(Visit::Applied(effect))
    }

    fn walk_path(&mut self, path: PathBuf) -> Result<()> {
        let metadata = fs::symlink_metadata(&path).map_err(|source| Error::Walk {
            path: path.clone(),
            source,
        })?;
        let entry = Entry::from_metadata(path, &metadata);

        let visit = self.visit(&entry)?;
        self.summary.record(visit);

        if entry.is_dir {
            for child in read_dir_sorted(&entry.path)? {
                self.walk_path(child)?;
            }
        }

        Ok(())
    }
}

/// Lexically clean `path`: drop `.` components and fold `name/..` pairs.
///
/// `.` on its own cleans to the empty path, so joining onto it yields a
/// bare name. Leading `..` components of a relative path are kept.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Read the children of `dir`, sorted by file name.
///
/// Child paths are joined onto the cleaned form of `dir`.
fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let walk_err = |source: std::io::Error| Error::Walk {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(walk_err)? {
        names.push(entry.map_err(walk_err)?.file_name());
    }
    names.sort();

    let base = clean_path(dir);
    Ok(names.into_iter().map(|name| base.join(name)).collect())
}

/// Sweep the tree under `root` according to `config`.
///
/// Listed paths go to `out`. Deletions are recorded in `audit`. Both sinks
/// belong to the caller and are only written by the mode that needs them.
pub fn run<O: Write, L: Write>(
    root: &Path,
    out: &mut O,
    config: &TraversalConfig,
    audit: &mut AuditLog<L>,
) -> Result<WalkSummary> {
    match &config.mode {
        Mode::List => Walker::new(config, ListAction::new(out)).walk(root),
        Mode::Delete => Walker::new(config, DeleteAction::new(audit)).walk(root),
        Mode::ArchiveOnly { destination } => {
            Walker::new(config, ArchiveAction::new(destination, root)).walk(root)
        }
        Mode::ArchiveThenDelete { destination } => {
            let action = ArchiveAction::new(destination, root).then_delete(audit);
            Walker::new(config, action).walk(root)
        }
    }
}
