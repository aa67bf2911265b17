//! Small shared helpers for file access and path classification.

use std::fs;
use std::path::Path;

use super::error::ScanError;

/// Read a source file as strict UTF-8. Invalid bytes are an error, not a
/// lossy replacement: a misread name could mark the wrong asset used.
pub(crate) fn read_source(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ScanError::Encoding {
        path: path.to_path_buf(),
    })
}

/// True when any ancestor directory of `path` is an `.xcassets` catalog.
/// Files under a catalog subtree are catalog contents, never sources.
pub(crate) fn has_catalog_ancestor(path: &Path) -> bool {
    path.ancestors().skip(1).any(|ancestor| {
        ancestor
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(".xcassets"))
    })
}

/// Lowercased file extension, if any.
pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
