//! Listing matched files to an output sink

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::walker::Entry;

use super::{Action, Effect};

/// Write `path` and a newline to `out`.
pub fn list_file<W: Write + ?Sized>(path: &Path, out: &mut W) -> Result<()> {
    writeln!(out, "{}", path.display()).map_err(Error::Output)
}

/// Lists every included file.
pub struct ListAction<'a, W: Write + ?Sized> {
    out: &'a mut W,
}

impl<'a, W: Write + ?Sized> ListAction<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }
}

impl<W: Write + ?Sized> Action for ListAction<'_, W> {
    fn apply(&mut self, entry: &Entry) -> Result<Effect> {
        list_file(&entry.path, self.out)?;
        Ok(Effect::Listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_list_writes_line() {
        let mut out = Vec::new();
        list_file(Path::new("testdata/dir.log"), &mut out).unwrap();
        list_file(Path::new("testdata/dir2/script.sh"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "testdata/dir.log\ntestdata/dir2/script.sh\n"
        );
    }

    #[test]
    fn test_list_surfaces_sink_error() {
        let err = list_file(Path::new("a.log"), &mut ClosedSink).unwrap_err();
        assert!(matches!(err, Error::Output(_)));
        assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::BrokenPipe);
    }
}
