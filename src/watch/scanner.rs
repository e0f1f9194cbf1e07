// src/watch/scanner.rs

//! Directory expansion and rescanning.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::filter::FileFilter;
use crate::watch::path_utils::{file_name_str, is_hidden};
use crate::watch::set::WatchSet;

/// Result of walking a directory tree.
#[derive(Debug, Default)]
pub struct Walked {
    /// Every directory visited, the root included. Hidden directories are
    /// neither listed nor descended into.
    pub directories: Vec<PathBuf>,
    /// Files whose full path matches the filter.
    pub files: Vec<PathBuf>,
}

/// Walk the tree rooted at `root`.
///
/// Subdirectories whose name starts with the hidden marker are pruned along
/// with everything below them, and symlinked subdirectories are never
/// entered, so a link back up the tree can't alias files. Symlinked files
/// are listed like regular ones. The root itself is always walked. Order
/// follows the traversal and is not meaningful.
pub fn walk(fs: &dyn FileSystem, root: &Path, filter: &FileFilter) -> Walked {
    let mut walked = Walked::default();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let children = match fs.read_dir(&dir) {
            Ok(children) => children,
            Err(err) => {
                debug!(?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };
        walked.directories.push(dir);

        for path in children {
            if fs.is_dir(&path) {
                if is_hidden(&path) {
                    debug!(?path, "pruning hidden directory");
                    continue;
                }
                if fs.is_symlink(&path) {
                    debug!(?path, "not following directory symlink");
                    continue;
                }
                stack.push(path);
            } else if fs.is_file(&path) && filter.matches_path(&path) {
                walked.files.push(path);
            }
        }
    }

    walked
}

/// All files below `root` matching `filter`, recursively.
pub fn expand(fs: &dyn FileSystem, root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    walk(fs, root, filter).files
}

/// Re-list the immediate children of every registered directory and watch
/// anything new.
///
/// - Files must match the rule's filter by name and must not already be
///   watched; existing entries are left alone so their callbacks survive.
/// - New subdirectories are registered (recursively) unless hidden or
///   symlinked.
///
/// Returns how many files became watched.
pub fn rescan(fs: &dyn FileSystem, set: &mut WatchSet) -> usize {
    let before = set.len();
    let rules = set.directories().to_vec();

    for rule in rules {
        let children = match fs.read_dir(rule.path()) {
            Ok(children) => children,
            Err(err) => {
                debug!(dir = ?rule.path(), error = %err, "watched directory unavailable");
                continue;
            }
        };

        for child in children {
            let Some(name) = file_name_str(&child) else {
                continue;
            };
            if name == "." || name == ".." {
                continue;
            }

            if fs.is_dir(&child) {
                if is_hidden(&child) || fs.is_symlink(&child) || set.has_directory(&child) {
                    continue;
                }
                debug!(dir = ?child, "discovered new directory");
                set.add(fs, &child, rule.filter(), rule.callback().cloned());
            } else if rule.filter().is_match(&name) && set.index_of(&child).is_none() {
                if set.add(fs, &child, rule.filter(), rule.callback().cloned()) {
                    debug!(path = ?child, "discovered new file");
                }
            }
        }
    }

    set.len().saturating_sub(before)
}
