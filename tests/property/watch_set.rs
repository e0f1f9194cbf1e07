use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;
use pollwatch::fs::mock::MockFileSystem;
use pollwatch::{WatchOptions, Watcher};

const POOL: usize = 12;

fn pool_path(i: usize) -> PathBuf {
    PathBuf::from(format!("/pool/dir{}/file{}.txt", i % 3, i))
}

fn pool_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    for i in 0..POOL {
        fs.add_file(pool_path(i), i as f64);
    }
    fs
}

proptest! {
    // Any sequence of registrations keeps one entry per path, ordered by
    // first registration.
    #[test]
    fn registrations_never_duplicate(order in proptest::collection::vec(0..POOL, 0..40)) {
        let fs = pool_fs();
        let mut watcher = Watcher::with_filesystem(WatchOptions::default(), Arc::new(fs));

        let mut first_seen = Vec::new();
        let mut seen = HashSet::new();
        for i in &order {
            prop_assert!(watcher.push(pool_path(*i)));
            if seen.insert(*i) {
                first_seen.push(*i);
            }
        }

        prop_assert_eq!(watcher.watching().len(), first_seen.len());
        for (index, i) in first_seen.iter().enumerate() {
            prop_assert_eq!(watcher.index_of(pool_path(*i)), Some(index));
        }
    }

    // Touching an arbitrary subset reports exactly that subset, once.
    #[test]
    fn only_touched_files_are_reported(touched in proptest::collection::hash_set(0..POOL, 0..POOL)) {
        let fs = pool_fs();
        let mut watcher =
            Watcher::with_filesystem(WatchOptions::default(), Arc::new(fs.clone()));
        watcher.push("/pool");
        prop_assert_eq!(watcher.watching().len(), POOL);

        for i in &touched {
            fs.touch(pool_path(*i), 1000.0 + *i as f64);
        }

        let report = watcher.scan();
        let changed: HashSet<PathBuf> = report.changed.into_iter().collect();
        let expected: HashSet<PathBuf> = touched.iter().map(|i| pool_path(*i)).collect();
        prop_assert_eq!(changed, expected);
        prop_assert!(!watcher.process());
    }
}
