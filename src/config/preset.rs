//! Preset reference resolution.
//!
//! A reference is a path or a bare name. Candidates are generated as an
//! ordered list — the referencing file's directory, its `presets/`
//! subdirectory, `presets/` under the cwd, then the install root — each
//! tried verbatim and, when the reference carries no extension, with
//! `.yaml`, `.yml` and `.json` appended.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::paths;

/// Resolve a preset reference to an existing file.
pub fn resolve_preset(reference: &str, base_dir: &Path) -> Result<PathBuf, ConfigError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Schema {
            path: base_dir.to_path_buf(),
            message: "preset reference must be a non-empty string".to_string(),
        });
    }

    let reference_path = Path::new(trimmed);
    let has_extension = reference_path.extension().is_some();
    let has_separator = trimmed.contains(['/', '\\']);

    let mut candidates: Vec<PathBuf> = Vec::new();
    if reference_path.is_absolute() {
        push_variants(&mut candidates, reference_path.to_path_buf(), has_extension);
    } else {
        push_variants(&mut candidates, base_dir.join(trimmed), has_extension);
        if !has_separator {
            push_variants(
                &mut candidates,
                base_dir.join("presets").join(trimmed),
                has_extension,
            );
            if let Ok(cwd) = std::env::current_dir() {
                push_variants(
                    &mut candidates,
                    cwd.join("presets").join(trimmed),
                    has_extension,
                );
            }
            if let Some(root) = install_root() {
                push_variants(
                    &mut candidates,
                    root.join("presets").join(trimmed),
                    has_extension,
                );
            }
        }
    }

    let mut checked = HashSet::new();
    for candidate in candidates {
        let normalized = paths::normalize(&candidate);
        if !checked.insert(normalized.clone()) {
            continue;
        }
        if normalized.is_file() {
            return Ok(normalized);
        }
    }

    Err(ConfigError::PresetNotFound {
        reference: trimmed.to_string(),
        base: base_dir.to_path_buf(),
    })
}

fn push_variants(out: &mut Vec<PathBuf>, target: PathBuf, has_extension: bool) {
    if has_extension {
        out.push(target);
        return;
    }
    out.push(target.clone());
    for ext in ["yaml", "yml", "json"] {
        out.push(target.with_extension(ext));
    }
}

/// Directory of the running executable; the last place a bare preset name
/// is searched.
fn install_root() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()?
        .parent()
        .map(Path::to_path_buf)
}
