//! Candidate target resolution.
//!
//! The default location table is static per-platform data; the part that
//! earns its keep is the resolution step — existence filtering,
//! canonicalization, and de-duplication down to top-most paths.

use std::env;
use std::path::PathBuf;

use crate::options::RuntimeOptions;

/// Platform whose default cleanup locations apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }
}

/// Built-in cleanup candidates for a platform. Paths that do not exist are
/// dropped later, during resolution.
pub fn default_candidates(platform: Platform) -> Vec<PathBuf> {
    let mut candidates = vec![env::temp_dir()];
    match platform {
        Platform::Windows => {
            let win_dir = env::var_os("WINDIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("C:/Windows"));
            candidates.push(win_dir.join("Temp"));
            candidates.push(win_dir.join("Prefetch"));
            candidates.push(win_dir.join("SoftwareDistribution").join("Download"));
            candidates.push(win_dir.join("System32").join("LogFiles"));
            let system_drive = env::var_os("SystemDrive")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("C:"));
            candidates.push(system_drive.join("Temp"));
            candidates.push(system_drive.join("$Recycle.Bin"));
            if let Some(local) = env::var_os("LOCALAPPDATA").map(PathBuf::from) {
                candidates.push(local.join("Microsoft").join("Windows").join("INetCache"));
                candidates.push(
                    local
                        .join("Google")
                        .join("Chrome")
                        .join("User Data")
                        .join("Default")
                        .join("Cache"),
                );
                candidates.push(
                    local
                        .join("Microsoft")
                        .join("Edge")
                        .join("User Data")
                        .join("Default")
                        .join("Cache"),
                );
                candidates.push(local.join("CrashDumps"));
            }
            if let Some(roaming) = env::var_os("APPDATA").map(PathBuf::from) {
                candidates.push(roaming.join("npm-cache"));
            }
        }
        Platform::MacOs => {
            candidates.push(PathBuf::from("/var/tmp"));
            if let Some(home) = dirs::home_dir() {
                let library = home.join("Library");
                candidates.push(library.join("Caches"));
                candidates.push(library.join("Logs"));
                let support = library.join("Application Support");
                candidates.push(
                    support
                        .join("Google")
                        .join("Chrome")
                        .join("Default")
                        .join("Cache"),
                );
                candidates.push(support.join("Code").join("Cache"));
                candidates.push(
                    support
                        .join("Microsoft Edge")
                        .join("Default")
                        .join("Cache"),
                );
            }
        }
        Platform::Linux => {
            candidates.push(PathBuf::from("/var/tmp"));
            candidates.push(PathBuf::from("/var/cache/apt/archives"));
            candidates.push(PathBuf::from("/var/cache/apt/archives/partial"));
            if let Some(cache) = dirs::cache_dir() {
                candidates.push(cache.clone());
                candidates.push(cache.join("npm"));
                candidates.push(cache.join("yarn"));
                candidates.push(cache.join("pip"));
                candidates.push(cache.join("google-chrome"));
                candidates.push(cache.join("chromium"));
                candidates.push(cache.join("Code").join("Cache"));
            }
            if let Some(home) = dirs::home_dir() {
                candidates.push(home.join(".npm"));
            }
        }
    }
    candidates
}

/// Targets for a run: the platform default table plus user-supplied dirs,
/// pushed through [`resolve_candidates`].
pub fn resolve_targets(options: &RuntimeOptions, platform: Platform) -> Vec<PathBuf> {
    resolve_candidates(
        default_candidates(platform)
            .into_iter()
            .chain(options.extra_dirs.iter().cloned()),
    )
}

/// Keep only candidates that exist and are directories, canonicalized and
/// de-duplicated; of a nested pair only the top-most survives, so nothing
/// is visited twice.
pub fn resolve_candidates<I>(candidates: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut resolved: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        let Ok(canonical) = candidate.canonicalize() else {
            continue;
        };
        if !canonical.is_dir() {
            continue;
        }
        if !resolved.contains(&canonical) {
            resolved.push(canonical);
        }
    }

    resolved
        .iter()
        .filter(|path| {
            !resolved
                .iter()
                .any(|other| other.as_path() != path.as_path() && path.starts_with(other))
        })
        .cloned()
        .collect()
}
