#![allow(dead_code)]

use std::path::{Path, PathBuf};

use pollwatch::Watcher;

pub use pollwatch_test_utils::{
    bump_mtime, init_tracing, set_mtime, CallRecorder, ConfigFileBuilder, TreeBuilder,
};

/// Watched paths relative to `root`, sorted, with `/` separators.
pub fn watched_names(watcher: &Watcher, root: &Path) -> Vec<String> {
    let mut names: Vec<String> = watcher
        .watching()
        .iter()
        .filter_map(|item| item.path().strip_prefix(root).ok())
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        .collect();
    names.sort();
    names
}

pub fn paths(root: &Path, rels: &[&str]) -> Vec<PathBuf> {
    rels.iter().map(|rel| root.join(rel)).collect()
}
