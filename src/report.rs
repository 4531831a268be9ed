//! Run summary rendering for the logging side channel.

use std::time::Duration;

use humansize::{format_size, BINARY};
use tracing::info;

use crate::metrics::CleanReport;

/// Heaviest targets listed in the summary.
const TOP_TARGETS: usize = 5;
/// Permission-denied paths shown before the overflow counter.
const DENIED_PREVIEW: usize = 5;

/// Human-readable elapsed time, coarse on purpose.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        return format!("{millis} ms");
    }
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        return format!("{secs:.1} s");
    }
    let minutes = (secs / 60.0) as u64;
    if minutes < 60 {
        let rem = secs - minutes as f64 * 60.0;
        format!("{minutes} m {rem:.0} s")
    } else {
        format!("{} h {} m", minutes / 60, minutes % 60)
    }
}

/// Render the summary as plain lines for the sink.
pub fn render_summary(report: &CleanReport) -> Vec<String> {
    let totals = &report.totals;
    let mut lines = vec![format!(
        "Summary: {} files, {} dirs, {} skipped, {} errors, {} reclaimed in {}",
        totals.files,
        totals.dirs,
        totals.skipped,
        totals.errors,
        format_size(totals.bytes, BINARY),
        format_duration(Duration::from_millis(report.duration_ms)),
    )];

    if report.dry_run {
        lines.push("Dry-run: reported bytes are hypothetical; nothing was deleted.".to_string());
    }

    if totals.skipped > 0 {
        lines.push(format!(
            "Skipped: {} excluded, {} too fresh, {} declined in preview",
            totals.skipped_by.excluded, totals.skipped_by.max_age, totals.skipped_by.preview
        ));
    }

    let mut heaviest: Vec<_> = report
        .targets
        .iter()
        .filter(|target| target.metrics.bytes > 0)
        .collect();
    heaviest.sort_by(|a, b| b.metrics.bytes.cmp(&a.metrics.bytes));
    if !heaviest.is_empty() {
        lines.push("Heaviest targets:".to_string());
        for target in heaviest.iter().take(TOP_TARGETS) {
            lines.push(format!(
                "  {:>10}  {}",
                format_size(target.metrics.bytes, BINARY),
                target.path.display()
            ));
        }
    }

    if !totals.permission_denied.is_empty() {
        lines.push(format!(
            "Permission denied ({}):",
            totals.permission_denied.len()
        ));
        for path in totals.permission_denied.iter().take(DENIED_PREVIEW) {
            lines.push(format!("  {}", path.display()));
        }
        let overflow = totals.permission_denied.len().saturating_sub(DENIED_PREVIEW);
        if overflow > 0 {
            lines.push(format!("  ... and {overflow} more"));
        }
    }

    lines
}

/// Emit the summary through the logging side channel.
pub fn log_summary(report: &CleanReport) {
    for line in render_summary(report) {
        info!("{line}");
    }
}
