// tests/integration/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use pollwatch::config::{load_and_validate, load_from_path, ConfigFile, WatchEntry};
use pollwatch::errors::PollwatchError;
use pollwatch_test_utils::ConfigFileBuilder;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_full_config_is_loaded() {
    let file = config_file(
        r#"
[config]
interval = 0.25
persistent = true
rescan_directories = false
exec = "echo changed"

[[watch]]
path = "src"
filter = "\\.rs$"

[[watch]]
path = "Cargo.toml"
exec = "cargo metadata"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.interval(), Duration::from_millis(250));
    assert!(cfg.options().persistent);
    assert!(!cfg.options().rescan_directories);
    assert_eq!(cfg.section().exec.as_deref(), Some("echo changed"));
    assert_eq!(cfg.watches().len(), 2);
    assert_eq!(cfg.watches()[0].filter.as_deref(), Some("\\.rs$"));
    assert_eq!(cfg.watches()[1].exec.as_deref(), Some("cargo metadata"));
}

#[test]
fn test_defaults_apply_when_sections_are_missing() {
    let file = config_file(
        r#"
[[watch]]
path = "."
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.interval(), Duration::from_secs(1));
    assert!(!cfg.options().persistent);
    assert!(cfg.options().rescan_directories);
    assert!(cfg.section().exec.is_none());
    assert_eq!(cfg.watches(), &[WatchEntry::new(".")]);
}

#[test]
fn test_empty_file_parses_but_does_not_validate() {
    let file = config_file("");

    let raw = load_from_path(file.path()).unwrap();
    assert!(raw.watch.is_empty());

    match ConfigFile::try_from(raw) {
        Err(PollwatchError::ConfigError(msg)) => assert!(msg.contains("nothing to watch")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_zero_interval_returns_config_error() {
    let raw = ConfigFileBuilder::new().with_path("src").interval(0.0).raw();

    match ConfigFile::try_from(raw) {
        Err(PollwatchError::ConfigError(msg)) => assert!(msg.contains("interval")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_filter_and_glob_together_return_config_error() {
    let file = config_file(
        r#"
[[watch]]
path = "src"
filter = "\\.rs$"
glob = "*.rs"
"#,
    );

    match load_and_validate(file.path()) {
        Err(PollwatchError::ConfigError(msg)) => {
            assert!(msg.contains("src"));
            assert!(msg.contains("glob"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_bad_regex_returns_invalid_filter() {
    let mut entry = WatchEntry::new("src");
    entry.filter = Some("([".to_string());
    let raw = ConfigFileBuilder::new().with_watch(entry).raw();

    match ConfigFile::try_from(raw) {
        Err(PollwatchError::InvalidFilter { pattern, .. }) => assert_eq!(pattern, "(["),
        other => panic!("Expected InvalidFilter, got: {:?}", other),
    }
}

#[test]
fn test_empty_exec_and_path_are_rejected() {
    let raw = ConfigFileBuilder::new().with_path("src").exec("  ").raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(PollwatchError::ConfigError(_))
    ));

    let raw = ConfigFileBuilder::new().with_watch(WatchEntry::new("")).raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(PollwatchError::ConfigError(_))
    ));
}

#[test]
fn test_malformed_toml_returns_toml_error() {
    let file = config_file("[config\ninterval = ");

    assert!(matches!(
        load_from_path(file.path()),
        Err(PollwatchError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        load_from_path(dir.path().join("Pollwatch.toml")),
        Err(PollwatchError::IoError(_))
    ));
}

#[test]
fn test_unrepresentable_interval_returns_config_error() {
    let file = config_file(
        r#"
[config]
interval = 1e30

[[watch]]
path = "src"
"#,
    );

    match load_and_validate(file.path()) {
        Err(PollwatchError::ConfigError(msg)) => assert!(msg.contains("out of range")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_tiny_interval_is_accepted() {
    let cfg = ConfigFileBuilder::new().with_path("src").interval(0.001).build();
    assert_eq!(cfg.interval(), Duration::from_millis(1));
}
