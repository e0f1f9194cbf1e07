mod common;
use crate::common::{bump_mtime, init_tracing, ConfigFileBuilder, TreeBuilder};

use std::fs;

use pollwatch::cli::CliArgs;
use pollwatch::config::{RawConfigFile, WatchEntry};
use pollwatch::errors::PollwatchError;
use pollwatch::{apply_cli_overrides, build_watcher, run};

#[test]
fn cli_flags_override_the_config_file() {
    let mut raw = ConfigFileBuilder::new()
        .with_path("from-file")
        .interval(5.0)
        .exec("echo file")
        .raw();
    let args = CliArgs {
        paths: vec!["a".to_string(), "b".to_string()],
        interval: Some(0.5),
        persistent: true,
        no_rescan: true,
        glob: Some("*.rs".to_string()),
        exec: Some("echo cli".to_string()),
        ..Default::default()
    };

    apply_cli_overrides(&mut raw, &args);

    assert_eq!(raw.config.interval, 0.5);
    assert!(raw.config.persistent);
    assert!(!raw.config.rescan_directories);
    assert_eq!(raw.config.exec.as_deref(), Some("echo cli"));
    let paths: Vec<&str> = raw.watch.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(paths, vec!["from-file", "a", "b"]);
    assert_eq!(raw.watch[1].glob.as_deref(), Some("*.rs"));
    assert!(raw.watch[0].glob.is_none());
}

#[test]
fn absent_flags_leave_the_config_untouched() {
    let mut raw = RawConfigFile::default();
    apply_cli_overrides(&mut raw, &CliArgs::default());

    assert_eq!(raw.config.interval, 1.0);
    assert!(!raw.config.persistent);
    assert!(raw.config.rescan_directories);
    assert!(raw.watch.is_empty());
}

#[test]
fn build_watcher_registers_entries_with_their_callbacks() {
    init_tracing();
    let tmp = TreeBuilder::new()
        .file("src/lib.rs", "")
        .file("src/README.md", "")
        .file("Cargo.toml", "")
        .build();

    let mut src = WatchEntry::new(tmp.path().join("src").to_string_lossy());
    src.glob = Some("*.rs".to_string());
    let mut manifest = WatchEntry::new(tmp.path().join("Cargo.toml").to_string_lossy());
    manifest.exec = Some("true".to_string());

    let cfg = ConfigFileBuilder::new()
        .with_watch(src)
        .with_watch(manifest)
        .with_path(tmp.path().join("missing"))
        .build();
    let watcher = build_watcher(&cfg).unwrap();

    assert!(watcher.callback().is_some());
    assert_eq!(watcher.watching().len(), 2);
    assert_eq!(watcher.index_of(tmp.path().join("src/lib.rs")), Some(0));
    assert!(watcher.watching()[0].callback().is_none());
    assert_eq!(watcher.index_of(tmp.path().join("Cargo.toml")), Some(1));
    assert!(watcher.watching()[1].callback().is_some());
}

#[cfg(unix)]
#[test]
fn exec_command_runs_with_the_changed_path() {
    init_tracing();
    let tmp = TreeBuilder::new().file("watched/a.txt", "").build();
    let watched = tmp.path().join("watched/a.txt");
    let out = tmp.path().join("out.log");

    let cmd = format!("printf '%s\\n' \"$POLLWATCH_PATH\" >> '{}'", out.display());
    let cfg = ConfigFileBuilder::new()
        .with_path(tmp.path().join("watched"))
        .exec(&cmd)
        .build();
    let mut watcher = build_watcher(&cfg).unwrap();

    bump_mtime(&watched, 7);
    assert!(watcher.process());

    let logged = fs::read_to_string(&out).unwrap();
    assert_eq!(logged.trim_end(), watched.to_string_lossy());
}

#[test]
fn dry_run_resolves_without_polling() {
    init_tracing();
    let tmp = TreeBuilder::new().file("a.txt", "").build();
    let args = CliArgs {
        paths: vec![tmp.path().to_string_lossy().into_owned()],
        dry_run: true,
        ..Default::default()
    };

    run(args).unwrap();
}

#[test]
fn run_without_paths_is_a_config_error() {
    let missing = tempfile::tempdir().unwrap();
    let config = missing.path().join("empty.toml");
    fs::write(&config, "[config]\ninterval = 2.0\n").unwrap();

    let args = CliArgs {
        config: Some(config.to_string_lossy().into_owned()),
        dry_run: true,
        ..Default::default()
    };

    assert!(matches!(run(args), Err(PollwatchError::ConfigError(_))));
}

#[test]
fn huge_interval_flag_is_rejected_before_polling() {
    let tmp = TreeBuilder::new().file("a.txt", "").build();
    let args = CliArgs {
        paths: vec![tmp.path().to_string_lossy().into_owned()],
        interval: Some(1e30),
        dry_run: true,
        ..Default::default()
    };

    assert!(matches!(run(args), Err(PollwatchError::ConfigError(_))));
}
