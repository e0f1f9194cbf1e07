// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime },
    Dir(Vec<String>), // List of child names
    Link(PathBuf),    // Target, relative to the link's parent unless absolute
}

/// Hops followed before a link chain is treated as broken.
const MAX_LINK_HOPS: usize = 8;

/// In-memory filesystem with explicit modification times.
///
/// Clones share the same tree, so a test can keep one handle while the
/// watcher owns another and mutate files between passes.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

/// Convert fractional seconds since the epoch into a `SystemTime`.
pub fn mtime(secs: f64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs_f64(secs)
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create (or replace) a file whose modification time is `secs` seconds
    /// after the epoch. Parent directories are created implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, secs: f64) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.lock();
        entries.insert(path.clone(), MockEntry::File { modified: mtime(secs) });
        link_into_parent(&mut entries, &path);
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.lock();
        ensure_dir_entry(&mut entries, path.as_ref());
    }

    /// Set a new modification time on an existing file.
    ///
    /// Touching a path that doesn't exist creates it, like `touch(1)`.
    pub fn touch(&self, path: impl AsRef<Path>, secs: f64) {
        self.add_file(path, secs);
    }

    /// Create a symbolic link at `path` pointing to `target`.
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.lock();
        entries.insert(path.clone(), MockEntry::Link(target.as_ref().to_path_buf()));
        link_into_parent(&mut entries, &path);
    }

    /// Remove a file or a whole directory subtree.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.lock();
        entries.retain(|p, _| !p.starts_with(path));

        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                let name = name.to_string_lossy();
                children.retain(|child| child.as_str() != name);
            }
        }
    }
}

fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return;
    };
    ensure_dir_entry(entries, parent);
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        let name = name.to_string_lossy().into_owned();
        if !children.contains(&name) {
            children.push(name);
        }
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(entries, path);
}

/// Follow links from `path` to a file or directory entry.
fn resolve<'a>(
    entries: &'a HashMap<PathBuf, MockEntry>,
    path: &Path,
) -> Option<&'a MockEntry> {
    let mut current = path.to_path_buf();
    for _ in 0..=MAX_LINK_HOPS {
        match entries.get(&current)? {
            MockEntry::Link(target) => {
                current = match current.parent() {
                    Some(parent) if target.is_relative() => lexical_join(parent, target),
                    _ => target.clone(),
                };
            }
            entry => return Some(entry),
        }
    }
    None
}

/// `base.join(rel)` with `.` and `..` folded away, without touching a real disk.
fn lexical_join(base: &Path, rel: &Path) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl FileSystem for MockFileSystem {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        match resolve(&self.lock(), path) {
            Some(MockEntry::File { modified }) => Some(*modified),
            _ => None,
        }
    }

    fn exists(&self, path: &Path) -> bool {
        resolve(&self.lock(), path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(resolve(&self.lock(), path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(resolve(&self.lock(), path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Link(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match resolve(&self.lock(), path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
