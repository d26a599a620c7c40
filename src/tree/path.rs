//! Path normalization for identity keys
//!
//! Node identity is the full-path name string, so both tree builders must
//! produce byte-identical names for the same logical entity.

use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a filesystem path for use as a tree root name
///
/// Resolves symlinks and `..`/`.` components, normalizes Unicode to NFC and
/// strips trailing separators so local and snapshot trees agree on names.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, crate::error::StorageError> {
    let canonical = dunce::canonicalize(path).map_err(|e| {
        crate::error::StorageError::InvalidPath(format!("Failed to canonicalize path: {}", e))
    })?;

    Ok(PathBuf::from(normalize_name(&canonical.to_string_lossy())))
}

/// Normalize a name string without filesystem access
///
/// NFC-normalizes Unicode and removes trailing slashes (except for a bare
/// root).
pub fn normalize_name(name: &str) -> String {
    let mut result: String = name.nfc().collect();
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }
    result
}

/// Join a parent identity key with a child's short name.
pub fn join_name(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        normalize_name(child)
    } else {
        normalize_name(&format!("{}/{}", parent, child))
    }
}
