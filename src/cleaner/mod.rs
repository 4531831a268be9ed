//! Cleanup orchestration.
//!
//! Pipeline: resolve targets, drop excluded ones, optionally gate through
//! the interactive preview, clean each target under the bounded scheduler,
//! then merge per-target metrics into an order-independent report.

pub mod inspect;
pub mod remove;

pub use inspect::{inspect_entry, inspect_path, Inspection};
pub use remove::clean_target;

use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{error, info};

use crate::deep::{DeepClean, UnsupportedDeepClean};
use crate::exclude::is_excluded;
use crate::limit::{effective_limit, run_with_limit};
use crate::metrics::{CleanReport, Metrics, TargetSummary};
use crate::options::RuntimeOptions;
use crate::preview::{confirm_targets, Confirm, TerminalConfirm};
use crate::report;
use crate::targets::{resolve_targets, Platform};

/// Drives one cleanup pass.
///
/// Collaborators (confirmation, deep clean) are swappable for embedding and
/// tests; the options are read-only once a run starts.
pub struct Cleaner {
    options: RuntimeOptions,
    platform: Platform,
    confirm: Box<dyn Confirm + Send>,
    deep: Box<dyn DeepClean + Send>,
}

impl Cleaner {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            options,
            platform: Platform::current(),
            confirm: Box::new(TerminalConfirm),
            deep: Box::new(UnsupportedDeepClean),
        }
    }

    /// Pin the platform default table.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace terminal prompting in the preview gate.
    pub fn with_confirm(mut self, confirm: Box<dyn Confirm + Send>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Replace the privileged deep-clean collaborator.
    pub fn with_deep_clean(mut self, deep: Box<dyn DeepClean + Send>) -> Self {
        self.deep = deep;
        self
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Resolve targets for the configured platform and clean them.
    pub async fn run(&mut self) -> CleanReport {
        let targets = resolve_targets(&self.options, self.platform);
        self.run_on(targets).await
    }

    /// Clean an explicit, already-resolved target list.
    ///
    /// Every scheduled task runs to completion; there is no cancellation
    /// primitive. An embedder needing mid-run abort must wrap the returned
    /// future with its own signal.
    pub async fn run_on(&mut self, targets: Vec<PathBuf>) -> CleanReport {
        let started = Instant::now();
        let mut totals = Metrics::new();

        // Whole targets inside an excluded subtree are dropped up front;
        // their contents never influence the run totals.
        let mut remaining: Vec<PathBuf> = Vec::new();
        for dir in targets {
            if is_excluded(&dir, &self.options.exclusions) {
                info!("[skip] target excluded: {}", dir.display());
            } else {
                remaining.push(dir);
            }
        }

        if self.options.interactive_preview && !remaining.is_empty() {
            let outcome =
                confirm_targets(remaining, self.options.dry_run, self.confirm.as_mut()).await;
            remaining = outcome.confirmed;
            totals.skipped += outcome.skipped;
            totals.skipped_by.preview += outcome.skipped;
            totals.errors += outcome.errors;
            if remaining.is_empty() {
                info!("preview: no directory was confirmed for cleanup");
            }
        }

        let mut summaries: Vec<TargetSummary> = Vec::new();
        if !remaining.is_empty() {
            let limit = effective_limit(
                self.options.concurrency,
                self.options.parallel,
                remaining.len(),
            );
            let options = &self.options;
            let factories: Vec<_> = remaining
                .into_iter()
                .map(|dir| {
                    move || async move {
                        let task_started = Instant::now();
                        let metrics = clean_target(&dir, options).await;
                        Ok::<_, Infallible>(TargetSummary {
                            path: dir,
                            metrics,
                            duration_ms: task_started.elapsed().as_millis() as u64,
                        })
                    }
                })
                .collect();
            summaries = match run_with_limit(factories, limit).await {
                Ok(summaries) => summaries,
                Err(never) => match never {},
            };
        }

        for summary in &summaries {
            totals.merge(&summary.metrics);
        }

        let run_report = CleanReport {
            totals,
            targets: summaries,
            duration_ms: started.elapsed().as_millis() as u64,
            dry_run: self.options.dry_run,
        };

        if self.options.summary {
            report::log_summary(&run_report);
        }

        if self.options.deep_clean && self.platform == Platform::Windows {
            if let Err(err) = self.deep.run() {
                error!("deep clean failed: {err:#}");
            }
        }

        run_report
    }
}
