// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Path, PathBuf};

/// Marker that makes a directory "hidden" (its subtree is never walked).
pub const HIDDEN_MARKER: char = '.';

/// Turn `path` into an absolute path without touching symlinks.
///
/// Relative paths are resolved against the current working directory. If
/// that fails (e.g. the cwd was deleted) the path is returned unchanged.
pub fn normalize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// True if the last component of `path` starts with [`HIDDEN_MARKER`].
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(HIDDEN_MARKER))
        .unwrap_or(false)
}

/// File name of `path` as an owned string (lossy), if it has one.
pub fn file_name_str(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
