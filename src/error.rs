//! Error types for the configuration and cleanup engines.
//!
//! Configuration failures abort the unit being applied; filesystem failures
//! during execution are isolated per entry and only counted.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A failure while loading, parsing, or merging configuration sources.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read from storage.
    #[error("{}: failed to read config: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is neither valid JSON nor valid YAML.
    #[error("{}: failed to parse config: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The document violates the allowed key set or a field's type.
    #[error("{}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    /// A preset re-references a file already on the active resolution chain.
    #[error("{}: cyclic preset reference", .path.display())]
    CyclicPreset { path: PathBuf },

    /// No candidate location yielded the referenced preset.
    #[error("preset \"{reference}\" not found (searched from {})", .base.display())]
    PresetNotFound { reference: String, base: PathBuf },

    /// A directory argument held no `.json`, `.yaml`, or `.yml` files.
    #[error("{}: directory contains no .json, .yaml or .yml config files", .path.display())]
    EmptyDirectory { path: PathBuf },
}

/// A filesystem failure observed while inspecting or removing an entry.
///
/// The permission-denied tag is classified here, at the single point where
/// the OS error is first seen; callers only check the flag.
#[derive(Debug, Error)]
#[error("failed to {op} {}: {source}", .path.display())]
pub struct FsError {
    /// Short verb for the failed operation ("stat", "read", "remove").
    pub op: &'static str,
    pub path: PathBuf,
    denied: bool,
    #[source]
    pub source: io::Error,
}

impl FsError {
    pub fn new(op: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        let denied = source.kind() == io::ErrorKind::PermissionDenied;
        Self {
            op,
            path: path.as_ref().to_path_buf(),
            denied,
            source,
        }
    }

    /// True when the underlying error indicates access denial.
    pub fn is_permission_denied(&self) -> bool {
        self.denied
    }

    /// True when the entry vanished before the operation reached it.
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}
