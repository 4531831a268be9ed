//! Subtree inspection: entry counts and byte totals ahead of removal.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::FsError;

/// What a walk found under one entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inspection {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    /// Children that could not be statted or listed.
    pub errors: u64,
}

/// Stat an entry without following symlinks, then measure it.
pub async fn inspect_path(path: &Path) -> Result<Inspection, FsError> {
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .map_err(|source| FsError::new("inspect", path, source))?;
    Ok(inspect_entry(path, metadata).await)
}

/// Measure an already-statted entry.
///
/// The walk is iterative over an explicit stack, so pathological nesting
/// cannot overflow the call stack. The non-dereferencing stat is re-taken
/// at every level: any symlink counts as a leaf, which keeps link cycles
/// unreachable. Child failures are logged and counted without aborting
/// their siblings.
pub async fn inspect_entry(path: &Path, metadata: Metadata) -> Inspection {
    let mut info = Inspection::default();
    let mut stack: Vec<(PathBuf, Metadata)> = vec![(path.to_path_buf(), metadata)];

    while let Some((current, metadata)) = stack.pop() {
        if metadata.file_type().is_symlink() || !metadata.is_dir() {
            info.files += 1;
            info.bytes += metadata.len();
            continue;
        }

        info.dirs += 1;
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(source) => {
                warn!("{}", FsError::new("read", &current, source));
                info.errors += 1;
                continue;
            }
        };
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let child = entry.path();
                    match tokio::fs::symlink_metadata(&child).await {
                        Ok(child_metadata) => stack.push((child, child_metadata)),
                        Err(source) => {
                            warn!("{}", FsError::new("inspect", &child, source));
                            info.errors += 1;
                        }
                    }
                }
                Ok(None) => break,
                Err(source) => {
                    warn!("{}", FsError::new("read", &current, source));
                    info.errors += 1;
                    break;
                }
            }
        }
    }

    info
}
