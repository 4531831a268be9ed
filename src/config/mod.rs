//! Configuration loading and preset merging.
//!
//! Documents are JSON or YAML with a closed key set. A document may import
//! presets, which are resolved recursively (cycle-safe, cached) and merged
//! depth-first before the document's own fields, so the referencing file
//! always wins.

pub mod document;
pub mod merge;
pub mod preset;
pub mod schema;

pub use document::{parse_duration, ConfigDocument, MaxAge};
pub use merge::{resolve_config, resolve_named_preset, ConfigResolver, MergeAccumulator};
pub use preset::resolve_preset;
pub use schema::config_schema;
