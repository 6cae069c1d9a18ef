//! Resolving opaque video references to playable files.
//!
//! Dictionary entries carry whatever path the recording pipeline wrote, which
//! rarely matches the deployment layout. [`VideoLibrary::resolve`] probes a
//! short list of candidate locations and returns the first that exists;
//! playback itself is out of scope here.

use std::path::{Path, PathBuf};

/// Candidate search roots for sign videos.
#[derive(Clone, Debug, Default)]
pub struct VideoLibrary {
    roots: Vec<PathBuf>,
}

impl VideoLibrary {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Probe, in order: the reference as given, its bare file name, then the
    /// file name under each search root. First existing file wins.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        if reference.is_empty() {
            return None;
        }
        let direct = Path::new(reference);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        let name = direct.file_name()?;
        let bare = PathBuf::from(name);
        if bare.is_file() {
            return Some(bare);
        }
        for root in &self.roots {
            let candidate = root.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}
