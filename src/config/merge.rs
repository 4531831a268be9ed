//! Merge accumulator and the recursive config/preset resolver.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::document::{self, non_empty_strings, CONFIG_EXTENSIONS};
use crate::config::preset;
use crate::error::ConfigError;
use crate::options::RuntimeOptions;
use crate::paths;

/// Settings accumulated across a chain of configuration sources.
///
/// Lists append in application order; scalars are last-write-wins, with
/// `Option<Option<...>>` for the keys where an explicit null resets the
/// option. De-duplication happens only when folding into
/// [`RuntimeOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeAccumulator {
    pub dirs: Vec<PathBuf>,
    pub exclude: Vec<PathBuf>,
    pub max_age: Option<Option<Duration>>,
    pub summary: Option<bool>,
    pub parallel: Option<bool>,
    pub dry_run: Option<bool>,
    pub deep: Option<bool>,
    pub log_file: Option<Option<PathBuf>>,
    pub concurrency: Option<Option<usize>>,
    pub preview: Option<bool>,
}

impl MergeAccumulator {
    /// Merge a later contribution over this one: lists concatenate, any
    /// scalar the addition carries wins.
    pub fn merge(mut self, addition: Self) -> Self {
        self.dirs.extend(addition.dirs);
        self.exclude.extend(addition.exclude);
        if addition.max_age.is_some() {
            self.max_age = addition.max_age;
        }
        if addition.summary.is_some() {
            self.summary = addition.summary;
        }
        if addition.parallel.is_some() {
            self.parallel = addition.parallel;
        }
        if addition.dry_run.is_some() {
            self.dry_run = addition.dry_run;
        }
        if addition.deep.is_some() {
            self.deep = addition.deep;
        }
        if addition.log_file.is_some() {
            self.log_file = addition.log_file;
        }
        if addition.concurrency.is_some() {
            self.concurrency = addition.concurrency;
        }
        if addition.preview.is_some() {
            self.preview = addition.preview;
        }
        self
    }

    /// Fold the accumulated settings into the runtime options. Lists
    /// de-duplicate on insert; scalars overwrite.
    pub fn apply(&self, options: &mut RuntimeOptions) {
        for dir in &self.dirs {
            options.add_dir(dir);
        }
        for dir in &self.exclude {
            options.add_exclusion(dir);
        }
        if let Some(max_age) = self.max_age {
            options.max_age = max_age;
        }
        if let Some(concurrency) = self.concurrency {
            options.set_concurrency(concurrency);
        }
        if let Some(summary) = self.summary {
            options.summary = summary;
        }
        if let Some(parallel) = self.parallel {
            options.parallel = parallel;
        }
        if let Some(dry_run) = self.dry_run {
            options.dry_run = dry_run;
        }
        if let Some(deep) = self.deep {
            options.deep_clean = deep;
        }
        if let Some(log_file) = &self.log_file {
            options.log_file = log_file.clone();
        }
        if let Some(preview) = self.preview {
            options.interactive_preview = preview;
        }
    }
}

/// Resolves configuration sources into a single [`MergeAccumulator`].
///
/// One resolver spans one top-level resolution call: its cache guarantees a
/// given normalized path is read from storage at most once, and its active
/// chain turns preset re-entry into a [`ConfigError::CyclicPreset`].
#[derive(Debug, Default)]
pub struct ConfigResolver {
    cache: HashMap<PathBuf, MergeAccumulator>,
    chain: Vec<PathBuf>,
    files_read: usize,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a file, or a directory treated as an ordered batch.
    pub fn resolve_path(&mut self, path: &Path) -> Result<MergeAccumulator, ConfigError> {
        let resolved = paths::normalize(path);
        let metadata = std::fs::metadata(&resolved).map_err(|source| ConfigError::Read {
            path: resolved.clone(),
            source,
        })?;
        if metadata.is_dir() {
            self.resolve_directory(&resolved)
        } else {
            self.parse_file(&resolved)
        }
    }

    /// Apply every config file in a directory, sorted by natural-numeric
    /// filename order. All-or-nothing: any failing file fails the batch.
    pub fn resolve_directory(&mut self, dir: &Path) -> Result<MergeAccumulator, ConfigError> {
        let files = list_config_files(dir)?;
        if files.is_empty() {
            return Err(ConfigError::EmptyDirectory {
                path: dir.to_path_buf(),
            });
        }
        let mut accumulated = MergeAccumulator::default();
        for file in files {
            let contribution = self.parse_file(&file)?;
            accumulated = accumulated.merge(contribution);
        }
        Ok(accumulated)
    }

    /// Parse one file and its preset closure.
    pub fn parse_file(&mut self, path: &Path) -> Result<MergeAccumulator, ConfigError> {
        let normalized = paths::normalize(path);
        if self.chain.contains(&normalized) {
            return Err(ConfigError::CyclicPreset { path: normalized });
        }
        if let Some(cached) = self.cache.get(&normalized) {
            return Ok(cached.clone());
        }

        self.chain.push(normalized.clone());
        let result = self.parse_file_inner(&normalized);
        self.chain.pop();

        let accumulated = result?;
        self.cache.insert(normalized, accumulated.clone());
        Ok(accumulated)
    }

    fn parse_file_inner(&mut self, path: &Path) -> Result<MergeAccumulator, ConfigError> {
        let mut document = document::load_document(path)?;
        self.files_read += 1;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        // Presets merge first, so this file's own fields win over them.
        let mut accumulated = MergeAccumulator::default();
        if let Some(presets) = document.presets.take() {
            for reference in non_empty_strings(presets.into_vec(), "presets", path)? {
                let preset_path = preset::resolve_preset(&reference, &base_dir)?;
                let nested = self.parse_file(&preset_path)?;
                accumulated = accumulated.merge(nested);
            }
        }

        let own = document.extract(&base_dir, path)?;
        Ok(accumulated.merge(own))
    }

    #[cfg(test)]
    fn files_read(&self) -> usize {
        self.files_read
    }
}

/// Resolve a config file or directory with a fresh resolver.
pub fn resolve_config(path: &Path) -> Result<MergeAccumulator, ConfigError> {
    ConfigResolver::new().resolve_path(path)
}

/// Resolve a preset by name or path, searched from the current directory,
/// and parse it as a configuration source.
pub fn resolve_named_preset(reference: &str) -> Result<MergeAccumulator, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = preset::resolve_preset(reference, &cwd)?;
    ConfigResolver::new().parse_file(&path)
}

fn list_config_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_config = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                CONFIG_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            });
        if is_config && path.is_file() {
            files.push(paths::normalize(&path));
        }
    }

    files.sort_by(|a, b| {
        let a_name = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let b_name = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natural_cmp(&a_name, &b_name)
    });
    Ok(files)
}

/// Filename ordering that compares digit runs numerically, so
/// `10-extra.json` sorts after `2-base.json`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();
    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_run = take_number(&mut a_chars);
                let y_run = take_number(&mut b_chars);
                match x_run.cmp(&y_run) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                match x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()) {
                    Ordering::Equal => {
                        a_chars.next();
                        b_chars.next();
                    }
                    other => return other,
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars>) -> u128 {
    let mut value: u128 = 0;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(u128::from(digit));
        chars.next();
    }
    value
}
