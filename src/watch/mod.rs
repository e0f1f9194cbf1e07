// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Keeping the ordered set of watched files and the directory rules that
//!   feed it (`set`, `item`).
//! - Expanding directories and rediscovering new files (`scanner`).
//! - Fingerprinting files by modification time and dispatching callbacks on
//!   change (`fingerprint`, `detector`, `callback`).
//!
//! It never writes to the files it watches and never subscribes to kernel
//! notifications; every change is found by comparing fingerprints between
//! passes.

pub mod callback;
pub mod detector;
pub mod filter;
pub mod fingerprint;
pub mod item;
pub mod path_utils;
pub mod scanner;
pub mod set;
pub mod watcher;

pub use callback::Callback;
pub use detector::ScanReport;
pub use filter::FileFilter;
pub use fingerprint::{fingerprint, Fingerprint};
pub use item::{DirectoryRule, WatchedItem};
pub use set::WatchSet;
pub use watcher::Watcher;
