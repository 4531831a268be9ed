//! Runtime option set consumed by the cleanup engine.
//!
//! One instance lives per invocation. It is mutated while configuration
//! sources and flags are applied, then handed to the [`Cleaner`] and treated
//! as read-only for the rest of the run.
//!
//! [`Cleaner`]: crate::cleaner::Cleaner

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;

/// Options governing one cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Report planned removals without deleting anything.
    pub dry_run: bool,
    /// Clean targets concurrently (window = task count unless capped).
    pub parallel: bool,
    /// Cap on concurrently cleaned targets; `None` falls back to the
    /// parallel flag.
    pub concurrency: Option<usize>,
    /// Invoke the privileged deep-clean collaborator after the pass.
    pub deep_clean: bool,
    /// Append every status line to this file as well as the console.
    pub log_file: Option<PathBuf>,
    /// User-supplied directories cleaned in addition to platform defaults.
    pub extra_dirs: Vec<PathBuf>,
    /// Subtrees never visited for deletion.
    pub exclusions: Vec<PathBuf>,
    /// Only entries at least this old are removed.
    pub max_age: Option<Duration>,
    /// Log an aggregate summary when the run finishes.
    pub summary: bool,
    /// Confirm each target interactively, with a size preview.
    pub interactive_preview: bool,
}

impl RuntimeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extra directory, normalized and de-duplicated by resolved
    /// absolute path.
    pub fn add_dir(&mut self, dir: &Path) {
        let resolved = paths::normalize(dir);
        if !self.extra_dirs.contains(&resolved) {
            self.extra_dirs.push(resolved);
        }
    }

    /// Add an exclusion, normalized and de-duplicated.
    pub fn add_exclusion(&mut self, dir: &Path) {
        let resolved = paths::normalize(dir);
        if !self.exclusions.contains(&resolved) {
            self.exclusions.push(resolved);
        }
    }

    /// Set or reset the concurrency cap. A cap above one implies the
    /// parallel flag.
    pub fn set_concurrency(&mut self, concurrency: Option<usize>) {
        self.concurrency = concurrency;
        if concurrency.is_some_and(|n| n > 1) {
            self.parallel = true;
        }
    }
}
