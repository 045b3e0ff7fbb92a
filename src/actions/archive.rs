//! Compressing matched files into a mirrored directory tree

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use flate2::{Compression, GzBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::walker::{Entry, clean_path};

use super::delete::{AuditLog, delete_file};
use super::{Action, Effect};

/// Compute where the archive of `path` goes.
///
/// The directory of `path` relative to `root` is recreated under
/// `destination`, and the file name gets a `.gz` suffix:
/// `root/a/b/x.log` becomes `destination/a/b/x.log.gz`. Both paths are
/// compared in cleaned form, so `./logs` and `logs` name the same root.
/// When the walk root is the file itself the artifact lands directly in
/// `destination`.
pub fn archive_target(destination: &Path, root: &Path, path: &Path) -> Result<PathBuf> {
    let not_under_root = || Error::NotUnderRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    let root = clean_path(root);
    let cleaned = clean_path(path);
    let file_name = cleaned.file_name().ok_or_else(not_under_root)?;
    let rel_dir = if cleaned == root {
        Path::new("")
    } else {
        cleaned
            .parent()
            .and_then(|dir| dir.strip_prefix(&root).ok())
            .ok_or_else(not_under_root)?
    };
    // Never let the relative part climb out of, or replace, the destination
    if !rel_dir
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(not_under_root());
    }

    let mut name = file_name.to_os_string();
    name.push(".gz");
    Ok(destination.join(rel_dir).join(name))
}

/// Compress `path` into its mirrored location under `destination`.
///
/// `destination` must already exist and be a directory. Missing
/// intermediate directories are created. An existing artifact at the
/// target is overwritten, but only once the source has been opened.
/// The gzip header carries the source's base name. Returns the path of
/// the written artifact.
pub fn archive_file(destination: &Path, root: &Path, path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(destination).map_err(|source| Error::Destination {
        path: destination.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(Error::InvalidDestination(destination.to_path_buf()));
    }

    let target = archive_target(destination, root, path)?;
    let mut input = File::open(path).map_err(|source| Error::OpenSource {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = target.parent() {
        create_archive_dir(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let out = open_target(&target).map_err(|source| Error::OpenTarget {
        path: target.clone(),
        source,
    })?;

    let mut out = gzip_stream(&mut input, out, path, &target)?;
    out.flush()
        .and_then(|()| out.sync_all())
        .map_err(|source| Error::CloseTarget {
            path: target.clone(),
            source,
        })?;

    debug!(source = %path.display(), target = %target.display(), "archived");
    Ok(target)
}

/// Gzip all of `input` into `out`, naming the stream after `source`.
///
/// A failure while streaming the body is [`Error::Copy`]; a failure while
/// writing the trailer is [`Error::Compress`]. Returns `out` once the
/// trailer is written.
fn gzip_stream<R: Read, W: Write>(
    input: &mut R,
    out: W,
    source: &Path,
    target: &Path,
) -> Result<W> {
    let mut builder = GzBuilder::new();
    if let Some(name) = source.file_name() {
        builder = builder.filename(name.as_encoded_bytes());
    }
    let mut encoder = builder.write(out, Compression::default());

    io::copy(input, &mut encoder).map_err(|source_err| Error::Copy {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    encoder.finish().map_err(|source_err| Error::Compress {
        path: target.to_path_buf(),
        source: source_err,
    })
}

fn create_archive_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

fn open_target(target: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(target)
}

/// Archives every included file and leaves the source in place.
#[derive(Debug, Clone)]
pub struct ArchiveAction {
    destination: PathBuf,
    root: PathBuf,
}

impl ArchiveAction {
    pub fn new(destination: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            root: root.into(),
        }
    }

    /// Chain a delete after each successful archive.
    pub fn then_delete<W: Write>(self, audit: &mut AuditLog<W>) -> ArchiveThenDelete<'_, W> {
        ArchiveThenDelete {
            archive: self,
            audit,
        }
    }
}

impl Action for ArchiveAction {
    fn apply(&mut self, entry: &Entry) -> Result<Effect> {
        archive_file(&self.destination, &self.root, &entry.path)?;
        Ok(Effect::Archived)
    }
}

/// Archives every included file, then deletes the source.
///
/// The source is only removed once its artifact has been fully written.
pub struct ArchiveThenDelete<'a, W: Write> {
    archive: ArchiveAction,
    audit: &'a mut AuditLog<W>,
}

impl<W: Write> Action for ArchiveThenDelete<'_, W> {
    fn apply(&mut self, entry: &Entry) -> Result<Effect> {
        self.archive.apply(entry)?;
        delete_file(&entry.path, self.audit)?;
        Ok(Effect::ArchivedAndDeleted)
    }
}
