// Library crate for dustbuster
// Re-exports the configuration and cleanup engines for the CLI,
// integration tests, and embedding hosts

pub mod cleaner;
pub mod config;
pub mod deep;
pub mod error;
pub mod exclude;
pub mod limit;
pub mod logging;
pub mod metrics;
pub mod options;
pub mod paths;
pub mod preview;
pub mod report;
pub mod targets;

pub use cleaner::{clean_target, inspect_path, Cleaner, Inspection};
pub use config::{
    config_schema, parse_duration, resolve_config, ConfigResolver, MergeAccumulator,
};
pub use deep::{DeepClean, UnsupportedDeepClean};
pub use error::{ConfigError, FsError};
pub use limit::{effective_limit, run_with_limit};
pub use metrics::{CleanReport, Metrics, SkipReason, SkipReasons, TargetSummary};
pub use options::RuntimeOptions;
pub use preview::{Confirm, TargetPreview, TerminalConfirm};
pub use targets::{default_candidates, resolve_targets, Platform};
