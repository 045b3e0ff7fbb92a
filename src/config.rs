//! Configuration types for a sweep

use std::path::PathBuf;

/// What happens to each file that passes the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print the path to the output sink.
    #[default]
    List,
    /// Remove the file and record it in the audit log.
    Delete,
    /// Compress the file under `destination`, leaving the source in place.
    /// Nothing is written to the list sink in this mode; archived paths are
    /// only reported through debug logging.
    ArchiveOnly { destination: PathBuf },
    /// Compress the file under `destination`, then remove the source.
    ArchiveThenDelete { destination: PathBuf },
}

impl Mode {
    /// Resolve the mode from the individual command-line switches.
    ///
    /// `list` wins over everything else. Otherwise an archive destination
    /// archives, combined with `delete` if set. With nothing set, listing is
    /// the default.
    pub fn from_flags(list: bool, delete: bool, archive: Option<PathBuf>) -> Self {
        if list {
            return Mode::List;
        }
        match (archive, delete) {
            (Some(destination), true) => Mode::ArchiveThenDelete { destination },
            (Some(destination), false) => Mode::ArchiveOnly { destination },
            (None, true) => Mode::Delete,
            (None, false) => Mode::List,
        }
    }

    /// Archive destination, if this mode archives.
    pub fn archive_destination(&self) -> Option<&PathBuf> {
        match self {
            Mode::ArchiveOnly { destination } | Mode::ArchiveThenDelete { destination } => {
                Some(destination)
            }
            Mode::List | Mode::Delete => None,
        }
    }

    pub fn deletes(&self) -> bool {
        matches!(self, Mode::Delete | Mode::ArchiveThenDelete { .. })
    }
}

/// Configuration for one sweep. Built once by the caller and borrowed by the walker.
#[derive(Debug, Clone, Default)]
pub struct TraversalConfig {
    /// Required extension including the leading dot (e.g. `.log`).
    /// `None` or an empty string disables the check.
    pub extension: Option<String>,
    /// Files strictly smaller than this many bytes are skipped.
    pub min_size: u64,
    pub mode: Mode,
}

impl TraversalConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = if extension.is_empty() {
            None
        } else {
            Some(extension)
        };
        self
    }

    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// The extension filter, with the empty string treated as "no filter".
    pub fn extension_filter(&self) -> Option<&str> {
        self.extension.as_deref().filter(|ext| !ext.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_flag_takes_precedence() {
        let mode = Mode::from_flags(true, true, Some(PathBuf::from("/tmp/out")));
        assert_eq!(mode, Mode::List);
    }

    #[test]
    fn test_default_mode_is_list() {
        assert_eq!(Mode::from_flags(false, false, None), Mode::List);
        assert_eq!(TraversalConfig::default().mode, Mode::List);
    }

    #[test]
    fn test_archive_and_delete_combine() {
        let dest = PathBuf::from("backup");
        let mode = Mode::from_flags(false, true, Some(dest.clone()));
        assert_eq!(
            mode,
            Mode::ArchiveThenDelete {
                destination: dest.clone()
            }
        );
        assert!(mode.deletes());
        assert_eq!(mode.archive_destination(), Some(&dest));

        let mode = Mode::from_flags(false, false, Some(dest.clone()));
        assert!(!mode.deletes());
        assert_eq!(mode.archive_destination(), Some(&dest));
    }

    #[test]
    fn test_empty_extension_disables_filter() {
        let config = TraversalConfig::new(Mode::List).with_extension("");
        assert_eq!(config.extension_filter(), None);

        let config = TraversalConfig {
            extension: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.extension_filter(), None);

        let config = TraversalConfig::new(Mode::List).with_extension(".log");
        assert_eq!(config.extension_filter(), Some(".log"));
    }
}
