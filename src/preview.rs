//! Interactive preview gate.
//!
//! Strictly sequential by contract — prompts must never interleave — so the
//! gate runs before the bounded scheduler ever starts.

use std::path::PathBuf;

use humansize::{format_size, BINARY};
use tracing::{error, info, warn};

use crate::cleaner::inspect::inspect_path;

/// Size preview shown for one candidate target.
#[derive(Debug, Clone)]
pub struct TargetPreview {
    pub path: PathBuf,
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

/// Collaborator answering per-target confirmation prompts.
///
/// A substituted implementation takes precedence over terminal prompting,
/// for embedding hosts and tests.
pub trait Confirm {
    fn confirm(&mut self, preview: &TargetPreview) -> bool;
}

/// Affirmative prompt answers.
const AFFIRMATIVE: &[&str] = &["y", "yes", "1", "т", "так"];

/// Terminal prompt reading one stdin line per target. Declines when stdin
/// is not interactive, on empty input, and on anything non-affirmative.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, preview: &TargetPreview) -> bool {
        use std::io::{BufRead, IsTerminal, Write};

        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            warn!(
                "preview needs an interactive terminal; skipping {}",
                preview.path.display()
            );
            return false;
        }

        print!("Clean this directory? [y/N]: ");
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        // The stdin lock is scoped to this one prompt, so the input
        // resource is released on every exit path.
        if stdin.lock().read_line(&mut answer).unwrap_or(0) == 0 {
            return false;
        }
        AFFIRMATIVE.contains(&answer.trim().to_lowercase().as_str())
    }
}

/// Result of the preview pass.
#[derive(Debug, Default)]
pub struct PreviewOutcome {
    pub confirmed: Vec<PathBuf>,
    /// Targets declined at the prompt.
    pub skipped: u64,
    /// Targets that could not be inspected.
    pub errors: u64,
}

/// Show each candidate's size and ask for confirmation, one at a time.
pub async fn confirm_targets(
    targets: Vec<PathBuf>,
    dry_run: bool,
    confirm: &mut dyn Confirm,
) -> PreviewOutcome {
    let mut outcome = PreviewOutcome::default();

    for dir in targets {
        let info = match inspect_path(&dir).await {
            Ok(info) => info,
            Err(err) => {
                error!("{err}");
                outcome.errors += 1;
                continue;
            }
        };

        info!("[preview] {}", dir.display());
        info!(
            "[preview] files: {}, dirs: {}, estimated size: {}",
            info.files,
            info.dirs,
            format_size(info.bytes, BINARY)
        );
        if dry_run {
            info!("[preview] dry-run is active: confirming will not delete anything");
        }

        let preview = TargetPreview {
            path: dir.clone(),
            files: info.files,
            dirs: info.dirs,
            bytes: info.bytes,
        };
        if confirm.confirm(&preview) {
            outcome.confirmed.push(dir);
        } else {
            info!("[preview] skipped {}", dir.display());
            outcome.skipped += 1;
        }
    }

    outcome
}
