//! Privileged deep-clean collaborator seam.

use anyhow::Result;
use tracing::warn;

/// OS-privileged cleanup hook, invoked after the normal pass on Windows
/// when the deep-clean option is set. The engine only decides *when* to
/// call it; what an implementation does (recycle bin, update caches) is the
/// embedder's concern.
pub trait DeepClean {
    fn run(&self) -> Result<()>;
}

/// Default collaborator: no privileged backend is wired in.
#[derive(Debug, Default)]
pub struct UnsupportedDeepClean;

impl DeepClean for UnsupportedDeepClean {
    fn run(&self) -> Result<()> {
        warn!("deep clean requested, but no privileged cleanup backend is available");
        Ok(())
    }
}
