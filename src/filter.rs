//! Inclusion rules applied to every entry of a sweep

use std::path::Path;

/// Extension of `path` including the leading dot, or `""` when there is none.
///
/// Only the last dot of the base name counts, so `archive.tar.gz` gives `.gz`.
/// A dotfile such as `.bashrc` has no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Decide whether an entry is left alone.
///
/// Directories are always excluded (they are only descended into). Files
/// smaller than `min_size` are excluded; a file of exactly `min_size` bytes is
/// kept. A non-empty `extension` must match [`extension_of`] exactly,
/// case included.
pub fn should_exclude(
    path: &Path,
    extension: Option<&str>,
    min_size: u64,
    is_dir: bool,
    size: u64,
) -> bool {
    if is_dir || size < min_size {
        return true;
    }

    match extension {
        Some(ext) if !ext.is_empty() => extension_of(path) != ext,
        _ => false,
    }
}
