// src/watch/filter.rs

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::errors::{PollwatchError, Result};

/// Filename predicate attached to a registration.
///
/// - `All` matches everything (the default).
/// - `Regex` is an unanchored regular expression, e.g. `\.rs$`.
/// - `Glob` is a shell-style glob, e.g. `*.rs`.
#[derive(Clone, Default)]
pub enum FileFilter {
    #[default]
    All,
    Regex(Regex),
    Glob(GlobMatcher),
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFilter::All => f.write_str("All"),
            FileFilter::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            FileFilter::Glob(glob) => f.debug_tuple("Glob").field(&glob.glob().glob()).finish(),
        }
    }
}

impl FileFilter {
    /// Compile a regex filter.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(FileFilter::Regex)
            .map_err(|e| PollwatchError::InvalidFilter {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Compile a glob filter.
    pub fn glob(pattern: &str) -> Result<Self> {
        Glob::new(pattern)
            .map(|glob| FileFilter::Glob(glob.compile_matcher()))
            .map_err(|e| PollwatchError::InvalidFilter {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build a filter from optional config values; `None` for both means
    /// "match everything".
    pub fn from_patterns(regex: Option<&str>, glob: Option<&str>) -> Result<Self> {
        match (regex, glob) {
            (Some(_), Some(_)) => Err(PollwatchError::ConfigError(
                "a watch entry may set `filter` or `glob`, not both".to_string(),
            )),
            (Some(pattern), None) => Self::regex(pattern),
            (None, Some(pattern)) => Self::glob(pattern),
            (None, None) => Ok(FileFilter::All),
        }
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            FileFilter::All => true,
            FileFilter::Regex(re) => re.is_match(candidate),
            FileFilter::Glob(glob) => glob.is_match(candidate),
        }
    }

    /// Match against the whole path, as used while walking a directory tree.
    pub fn matches_path(&self, path: &Path) -> bool {
        self.is_match(&path.to_string_lossy())
    }

    /// Match against the final component only.
    pub fn matches_name(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.is_match(&name.to_string_lossy()),
            None => false,
        }
    }
}
