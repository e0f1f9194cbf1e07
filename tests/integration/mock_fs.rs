use std::path::PathBuf;
use std::sync::Arc;

use pollwatch::fs::mock::{mtime, MockFileSystem};
use pollwatch::fs::FileSystem;
use pollwatch::watch::scanner::{expand, walk};
use pollwatch::watch::{fingerprint, Fingerprint};
use pollwatch::{FileFilter, WatchOptions, Watcher};
use pollwatch_test_utils::{init_tracing, CallRecorder};

fn mock_watcher(fs: &MockFileSystem, options: WatchOptions) -> Watcher {
    Watcher::with_filesystem(options, Arc::new(fs.clone()))
}

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

#[test]
fn test_mock_fs_fingerprints() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.txt", 100.25);

    let fp = fingerprint(&fs, &PathBuf::from("/proj/a.txt")).unwrap();
    assert_eq!(fp, Fingerprint::new(mtime(100.25)));
    assert_eq!(fp.as_secs_f64(), 100.25);
    assert!(fingerprint(&fs, &PathBuf::from("/proj/missing.txt")).is_none());
    // Directories have no fingerprint.
    assert!(fingerprint(&fs, &PathBuf::from("/proj")).is_none());
}

#[test]
fn test_mock_fs_layout() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/main.rs", 1.0);
    fs.add_dir("/proj/empty");

    assert!(fs.is_dir(&PathBuf::from("/proj")));
    assert!(fs.is_dir(&PathBuf::from("/proj/src")));
    assert!(fs.is_file(&PathBuf::from("/proj/src/main.rs")));
    assert_eq!(
        sorted(fs.read_dir(&PathBuf::from("/proj")).unwrap()),
        vec![PathBuf::from("/proj/empty"), PathBuf::from("/proj/src")]
    );

    fs.remove("/proj/src");
    assert!(!fs.exists(&PathBuf::from("/proj/src/main.rs")));
    assert_eq!(
        fs.read_dir(&PathBuf::from("/proj")).unwrap(),
        vec![PathBuf::from("/proj/empty")]
    );
    assert!(fs.read_dir(&PathBuf::from("/proj/src")).is_err());
}

#[test]
fn test_walk_prunes_hidden_directories_but_not_the_root() {
    let fs = MockFileSystem::new();
    fs.add_file("/.work/a.txt", 1.0);
    fs.add_file("/.work/sub/b.txt", 1.0);
    fs.add_file("/.work/.git/HEAD", 1.0);
    fs.add_file("/.work/sub/.cache/c.txt", 1.0);

    let walked = walk(&fs, &PathBuf::from("/.work"), &FileFilter::All);

    assert_eq!(
        sorted(walked.directories),
        vec![PathBuf::from("/.work"), PathBuf::from("/.work/sub")]
    );
    assert_eq!(
        sorted(walked.files),
        vec![PathBuf::from("/.work/a.txt"), PathBuf::from("/.work/sub/b.txt")]
    );
}

#[test]
fn test_expand_matches_the_full_path() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/lib.rs", 1.0);
    fs.add_file("/proj/tests/it.rs", 1.0);
    fs.add_file("/proj/src/notes.md", 1.0);

    let filter = FileFilter::regex(r"/src/.*\.rs$").unwrap();
    let files = expand(&fs, &PathBuf::from("/proj"), &filter);

    assert_eq!(files, vec![PathBuf::from("/proj/src/lib.rs")]);
}

#[test]
fn test_expand_of_missing_directory_is_empty() {
    let fs = MockFileSystem::new();
    assert!(expand(&fs, &PathBuf::from("/nowhere"), &FileFilter::All).is_empty());
}

#[test]
fn test_detects_exact_mtime_changes() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.txt", 10.0);
    fs.add_file("/proj/b.txt", 10.0);
    let recorder = CallRecorder::new();

    let mut watcher =
        mock_watcher(&fs, WatchOptions::default()).with_callback(recorder.item_callback());
    assert!(watcher.push("/proj"));
    assert!(!watcher.process());

    // Same mtime: no change.
    fs.touch("/proj/a.txt", 10.0);
    assert!(!watcher.process());

    // Sub-second differences count.
    fs.touch("/proj/a.txt", 10.5);
    assert!(watcher.process());
    assert_eq!(recorder.calls(), vec![PathBuf::from("/proj/a.txt")]);

    // Going backwards in time is also a change.
    fs.touch("/proj/b.txt", 5.0);
    let report = watcher.scan();
    assert_eq!(report.changed, vec![PathBuf::from("/proj/b.txt")]);
    assert_eq!(
        watcher.watch_set().get("/proj/b.txt").unwrap().fingerprint(),
        Some(Fingerprint::new(mtime(5.0)))
    );
}

#[test]
fn test_files_created_between_passes_are_discovered() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/inbox");

    let mut watcher = mock_watcher(&fs, WatchOptions::default());
    watcher.push("/inbox");
    fs.add_file("/inbox/one.txt", 1.0);
    fs.add_file("/inbox/nested/two.txt", 1.0);

    let report = watcher.scan();
    assert_eq!(report.discovered, 2);
    assert!(!report.has_changes());
    assert!(watcher.watch_set().has_directory(&PathBuf::from("/inbox/nested")));
}

#[test]
fn test_persistent_mode_with_mock_fs() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/a.txt", 1.0);
    let recorder = CallRecorder::new();

    let mut watcher = mock_watcher(&fs, WatchOptions::default().persistent(true))
        .with_callback(recorder.bare_callback());
    watcher.push("/a.txt");

    fs.remove("/a.txt");
    let report = watcher.scan();
    assert_eq!(report.changed, vec![PathBuf::from("/a.txt")]);
    assert!(report.removed.is_empty());
    assert_eq!(watcher.watching()[0].fingerprint(), None);

    fs.add_file("/a.txt", 1.0);
    assert!(watcher.process());
    assert_eq!(recorder.count(), 2);
}

#[test]
fn test_overwrite_keeps_a_pending_change() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/a.txt", 1.0);
    let recorder = CallRecorder::new();

    let mut watcher = mock_watcher(&fs, WatchOptions::default());
    watcher.push("/a.txt");
    fs.touch("/a.txt", 2.0);

    // Re-registering before the next pass must not swallow the change.
    watcher.add("/a.txt", FileFilter::All, Some(recorder.item_callback()));
    assert!(watcher.process());
    assert_eq!(recorder.count(), 1);
}

#[test]
fn test_mock_symlinks_resolve_but_are_not_walked() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.txt", 3.0);
    fs.add_file("/proj/sub/b.txt", 3.0);
    fs.add_symlink("/proj/loop", ".");
    fs.add_symlink("/proj/sub/up", "..");
    fs.add_symlink("/proj/alias.txt", "a.txt");

    assert!(fs.is_symlink(&PathBuf::from("/proj/loop")));
    assert!(fs.is_dir(&PathBuf::from("/proj/loop")));
    assert!(!fs.is_symlink(&PathBuf::from("/proj/sub")));
    assert_eq!(
        fingerprint(&fs, &PathBuf::from("/proj/alias.txt")),
        Some(Fingerprint::new(mtime(3.0)))
    );

    let walked = walk(&fs, &PathBuf::from("/proj"), &FileFilter::All);
    assert_eq!(
        sorted(walked.directories),
        vec![PathBuf::from("/proj"), PathBuf::from("/proj/sub")]
    );
    assert_eq!(
        sorted(walked.files),
        vec![
            PathBuf::from("/proj/a.txt"),
            PathBuf::from("/proj/alias.txt"),
            PathBuf::from("/proj/sub/b.txt"),
        ]
    );
}

#[test]
fn test_rescan_skips_directory_symlinks() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.txt", 1.0);

    let mut watcher = mock_watcher(&fs, WatchOptions::default());
    watcher.push("/proj");
    fs.add_symlink("/proj/loop", ".");

    let report = watcher.scan();
    assert_eq!(report.discovered, 0);
    assert_eq!(watcher.watching().len(), 1);
    assert!(!watcher.watch_set().has_directory(&PathBuf::from("/proj/loop")));
}
