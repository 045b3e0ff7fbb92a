//! Deleting matched files and recording each removal

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use tracing::debug;

use crate::error::{Error, Result};
use crate::walker::Entry;

use super::{Action, Effect};

/// Label written at the start of every audit record.
pub const AUDIT_PREFIX: &str = "DELETED FILE: ";

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Append-only record of deleted files.
///
/// Each record is one line: `DELETED FILE: 2024/01/31 09:15:00 path/to/file`.
/// The caller owns the underlying writer and decides where it points.
pub struct AuditLog<W: Write> {
    writer: W,
}

impl<W: Write> AuditLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Append a record for `path` and flush it.
    pub fn record(&mut self, path: &Path) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}{} {}",
            AUDIT_PREFIX,
            Local::now().format(TIMESTAMP_FORMAT),
            path.display()
        )?;
        self.writer.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Remove the file at `path`, then record it in `audit`.
///
/// A failed removal is returned as [`Error::Delete`] and nothing is logged.
/// A failed audit write is returned as [`Error::Audit`]; by then the file
/// is already gone.
pub fn delete_file<W: Write>(path: &Path, audit: &mut AuditLog<W>) -> Result<()> {
    fs::remove_file(path).map_err(|source| Error::Delete {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "deleted");

    audit.record(path).map_err(|source| Error::Audit {
        path: path.to_path_buf(),
        source,
    })
}

/// Deletes every included file.
pub struct DeleteAction<'a, W: Write> {
    audit: &'a mut AuditLog<W>,
}

impl<'a, W: Write> DeleteAction<'a, W> {
    pub fn new(audit: &'a mut AuditLog<W>) -> Self {
        Self { audit }
    }
}

impl<W: Write> Action for DeleteAction<'_, W> {
    fn apply(&mut self, entry: &Entry) -> Result<Effect> {
        delete_file(&entry.path, self.audit)?;
        Ok(Effect::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_delete_removes_file_and_records_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.log");
        fs::write(&path, "dummy").unwrap();

        let mut audit = AuditLog::new(Vec::new());
        delete_file(&path, &mut audit).unwrap();

        assert!(!path.exists());
        let log = String::from_utf8(audit.into_inner()).unwrap();
        let line = log.strip_suffix('\n').expect("record ends with newline");
        assert!(!line.contains('\n'));
        assert!(line.starts_with(AUDIT_PREFIX));
        assert!(line.ends_with(&format!(" {}", path.display())));

        // "YYYY/MM/DD HH:MM:SS" sits between the prefix and the path
        let stamp = &line[AUDIT_PREFIX.len()..AUDIT_PREFIX.len() + 19];
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_delete_missing_file_fails_without_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.log");

        let mut audit = AuditLog::new(Vec::new());
        let err = delete_file(&path, &mut audit).unwrap_err();

        assert!(matches!(err, Error::Delete { .. }));
        assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::NotFound);
        assert!(audit.get_ref().is_empty());
    }

    #[test]
    fn test_audit_failure_escalates_after_removal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.log");
        fs::write(&path, "dummy").unwrap();

        let mut audit = AuditLog::new(FullDisk);
        let err = delete_file(&path, &mut audit).unwrap_err();

        assert!(matches!(err, Error::Audit { .. }));
        assert!(!path.exists());
    }
}
