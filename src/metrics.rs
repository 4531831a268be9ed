//! Cleanup metrics and the aggregated run report.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

/// Why a candidate entry or target was not removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Inside an excluded subtree.
    Excluded,
    /// Younger than the configured maximum age.
    MaxAge,
    /// Declined in the interactive preview.
    Preview,
}

/// Skip counts broken down by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipReasons {
    pub excluded: u64,
    pub max_age: u64,
    pub preview: u64,
}

/// Counters for one target, or for the whole run once merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Files removed (or that would be, in dry-run).
    pub files: u64,
    /// Directories removed (or that would be, in dry-run).
    pub dirs: u64,
    /// Bytes reclaimed; hypothetical under dry-run.
    pub bytes: u64,
    /// Entries not removed, for any reason.
    pub skipped: u64,
    /// Isolated per-entry failures.
    pub errors: u64,
    /// Skip counts keyed by reason.
    pub skipped_by: SkipReasons,
    /// De-duplicated paths whose removal was denied by the OS.
    pub permission_denied: BTreeSet<PathBuf>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another metrics value into this one.
    ///
    /// Counters add, skip reasons add key-wise, denied paths union; the
    /// operation is associative and commutative, so the final aggregate is
    /// independent of target-completion order.
    pub fn merge(&mut self, other: &Metrics) {
        self.files += other.files;
        self.dirs += other.dirs;
        self.bytes += other.bytes;
        self.skipped += other.skipped;
        self.errors += other.errors;
        self.skipped_by.excluded += other.skipped_by.excluded;
        self.skipped_by.max_age += other.skipped_by.max_age;
        self.skipped_by.preview += other.skipped_by.preview;
        self.permission_denied
            .extend(other.permission_denied.iter().cloned());
    }

    /// Record one skipped entry under its reason.
    pub fn skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        match reason {
            SkipReason::Excluded => self.skipped_by.excluded += 1,
            SkipReason::MaxAge => self.skipped_by.max_age += 1,
            SkipReason::Preview => self.skipped_by.preview += 1,
        }
    }

    /// Record a path whose removal the OS denied.
    pub fn record_denied(&mut self, path: PathBuf) {
        self.permission_denied.insert(path);
    }
}

/// Per-target slice of an aggregated report.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub path: PathBuf,
    pub metrics: Metrics,
    pub duration_ms: u64,
}

/// Structured outcome of one cleanup pass, returned to any caller.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    /// Order-independent merge of all per-target metrics.
    pub totals: Metrics,
    pub targets: Vec<TargetSummary>,
    /// Wall-clock duration of the pass.
    pub duration_ms: u64,
    pub dry_run: bool,
}
