//! Diagnostic artifact sinks.
//!
//! When a render wait times out, the waiter hands the page's final HTML and a
//! screenshot to a sink so the failure can be inspected later. Storage
//! failures are logged and swallowed: losing a debug artifact must never turn
//! a retrieval into an error.

use std::fs;
use std::path::PathBuf;

/// Accepts named byte blobs from the retrieval engine.
pub trait ArtifactSink: Send + Sync {
    fn store(&self, name: &str, bytes: &[u8]);
}

/// Writes artifacts into a directory, creating it on first use.
pub struct FsArtifactSink {
    dir: PathBuf,
}

impl FsArtifactSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for FsArtifactSink {
    fn store(&self, name: &str, bytes: &[u8]) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!("could not create artifact dir {:?}: {}", self.dir, e);
            return;
        }
        let path = self.dir.join(name);
        match fs::write(&path, bytes) {
            Ok(()) => tracing::info!("wrote diagnostic artifact {:?}", path),
            Err(e) => tracing::warn!("could not write artifact {:?}: {}", path, e),
        }
    }
}

/// Discards everything.
pub struct NullArtifactSink;

impl ArtifactSink for NullArtifactSink {
    fn store(&self, _name: &str, _bytes: &[u8]) {}
}
