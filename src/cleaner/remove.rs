//! Per-entry processing: filter, inspect, then remove (or log, in dry-run).

use std::fs::Metadata;
use std::path::Path;
use std::time::{Duration, SystemTime};

use humansize::{format_size, BINARY};
use tracing::{error, info};

use crate::cleaner::inspect::inspect_entry;
use crate::error::FsError;
use crate::exclude::is_excluded;
use crate::metrics::{Metrics, SkipReason};
use crate::options::RuntimeOptions;

/// Clear one target directory's contents, entry by entry.
///
/// Failures are isolated: logged and counted, never fatal to the run. A
/// target that vanished since resolution simply yields one counted error.
pub async fn clean_target(dir: &Path, options: &RuntimeOptions) -> Metrics {
    let mut metrics = Metrics::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(source) => {
            record_failure(&mut metrics, &FsError::new("read", dir, source));
            return metrics;
        }
    };

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => process_entry(&entry.path(), options, &mut metrics).await,
            Ok(None) => break,
            Err(source) => {
                record_failure(&mut metrics, &FsError::new("read", dir, source));
                break;
            }
        }
    }

    if options.dry_run {
        info!("[dry-run] finished {}", dir.display());
    } else {
        info!("cleaned {}", dir.display());
    }
    metrics
}

/// One top-level entry under a target: exclusion check, age check,
/// inspection, then removal. A failed or vanished removal never counts
/// toward the removed files/bytes.
async fn process_entry(path: &Path, options: &RuntimeOptions, metrics: &mut Metrics) {
    if is_excluded(path, &options.exclusions) {
        info!("[skip] excluded: {}", path.display());
        metrics.skip(SkipReason::Excluded);
        return;
    }

    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(source) => {
            record_failure(metrics, &FsError::new("stat", path, source));
            return;
        }
    };

    if let Some(max_age) = options.max_age {
        if entry_age(&metadata) < max_age {
            info!("[skip] too fresh: {}", path.display());
            metrics.skip(SkipReason::MaxAge);
            return;
        }
    }

    let info = inspect_entry(path, metadata.clone()).await;
    metrics.errors += info.errors;

    if options.dry_run {
        info!(
            "[dry-run] would remove {} ({})",
            path.display(),
            format_size(info.bytes, BINARY)
        );
    } else {
        if let Err(err) = remove_entry(path, &metadata).await {
            record_failure(metrics, &err);
            return;
        }
        info!("removed {}", path.display());
    }

    metrics.files += info.files;
    metrics.dirs += info.dirs;
    metrics.bytes += info.bytes;
}

async fn remove_entry(path: &Path, metadata: &Metadata) -> Result<(), FsError> {
    let result = if metadata.is_dir() && !metadata.file_type().is_symlink() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };
    result.map_err(|source| FsError::new("remove", path, source))
}

/// Age of an entry by mtime. A future mtime reads as age zero, so an
/// active age policy treats it as fresh; an unreadable mtime counts as old.
fn entry_age(metadata: &Metadata) -> Duration {
    match metadata.modified() {
        Ok(modified) => SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
        Err(_) => Duration::MAX,
    }
}

fn record_failure(metrics: &mut Metrics, err: &FsError) {
    error!("{err}");
    metrics.errors += 1;
    if err.is_permission_denied() {
        metrics.record_denied(err.path.clone());
    }
}
