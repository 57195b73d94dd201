//! Enumerator stage: walks the root and feeds regular files to the workers

use crate::concurrency::CancelToken;
use crate::error::BuildError;
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// A directory entry, classified once at discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A plain file; the only kind that gets hashed
    RegularFile(PathBuf),
    /// Directories, symlinks, devices, sockets and anything else
    Other(PathBuf),
}

impl Entry {
    pub fn classify(entry: &DirEntry) -> Self {
        // Symlinks are not followed, so their file type is the link itself.
        if entry.file_type().is_file() {
            Entry::RegularFile(entry.path().to_path_buf())
        } else {
            Entry::Other(entry.path().to_path_buf())
        }
    }
}

/// How a walk ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every entry was visited
    Completed { files: usize },
    /// The cancel signal was observed, or the workers went away
    Stopped { files: usize },
}

/// Depth-first walker over one root directory.
pub struct Walker {
    root: PathBuf,
}

impl Walker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Send every regular file below the root on `files`.
    ///
    /// `cancel` is checked before and after each entry. Returns the first
    /// traversal error; a cancelled walk is not an error.
    pub fn walk(
        &self,
        cancel: &CancelToken,
        files: &Sender<PathBuf>,
    ) -> Result<WalkOutcome, BuildError> {
        let mut sent = 0usize;
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            if cancel.is_cancelled() {
                debug!(files = sent, "walk cancelled");
                return Ok(WalkOutcome::Stopped { files: sent });
            }

            let entry = entry.map_err(|source| BuildError::Walk {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                source,
            })?;

            if entry.depth() == 0 && !entry.file_type().is_dir() {
                return Err(BuildError::RootNotDirectory(self.root.clone()));
            }

            let kind = Entry::classify(&entry);

            if cancel.is_cancelled() {
                debug!(files = sent, "walk cancelled");
                return Ok(WalkOutcome::Stopped { files: sent });
            }

            match kind {
                Entry::RegularFile(path) => {
                    trace!(path = %path.display(), "discovered file");
                    if files.send(path).is_err() {
                        debug!(files = sent, "all workers gone; stopping walk");
                        return Ok(WalkOutcome::Stopped { files: sent });
                    }
                    sent += 1;
                }
                Entry::Other(_) => {}
            }
        }

        debug!(files = sent, "walk completed");
        Ok(WalkOutcome::Completed { files: sent })
    }
}
