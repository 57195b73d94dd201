//! The Merkle tree: path insertion, bottom-up finalization, rendering

use crate::error::TreeError;
use crate::tree::hasher::{AggregateHasher, SortedConcatHasher};
use crate::tree::node::Node;
use crate::tree::path;
use crate::tree::render::{self, IndentedLine, RenderMode};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Merkle tree over the files below one root path.
///
/// Not synchronized: a single writer inserts, then calls [`HashTree::finalize`],
/// after which the tree is only read.
#[derive(Clone)]
pub struct HashTree {
    root: Node,
    root_path: PathBuf,
    hasher: Arc<dyn AggregateHasher>,
}

impl HashTree {
    /// Create an empty tree. The root node is named after the cleaned `root` path.
    pub fn new(root: impl AsRef<Path>, hasher: Arc<dyn AggregateHasher>) -> Self {
        let root_path = path::clean(root.as_ref());
        Self {
            root: Node::new(root_path.as_os_str()),
            root_path,
            hasher,
        }
    }

    /// Create an empty tree using SHA-256 aggregation.
    pub fn with_default_hasher(root: impl AsRef<Path>) -> Self {
        Self::new(root, Arc::new(SortedConcatHasher::default()))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The cleaned scan root every inserted path is resolved against.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn root_digest(&self) -> Option<&str> {
        self.root.digest()
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Record `digest` for the file at `file_path`, creating missing ancestors.
    ///
    /// `file_path` is cleaned and must name a strict descendant of the root.
    /// Inserting the same path again overwrites its digest.
    pub fn insert(
        &mut self,
        file_path: impl AsRef<Path>,
        digest: impl Into<String>,
    ) -> Result<(), TreeError> {
        let file_path = file_path.as_ref();
        if file_path.as_os_str().is_empty() {
            return Err(TreeError::EmptyPath);
        }

        let segments = path::relative_segments(&self.root_path, file_path).ok_or_else(|| {
            TreeError::NotRelative {
                path: file_path.to_path_buf(),
                root: self.root_path.clone(),
            }
        })?;

        let mut node = &mut self.root;
        let mut depth = 0;
        for segment in segments {
            // A leaf that already holds a file digest is about to gain children.
            if depth > 0 && node.is_leaf() && node.digest().is_some() {
                warn!(
                    path = %file_path.display(),
                    node = %node.name().to_string_lossy(),
                    "file path is also a directory; its own digest will be discarded"
                );
            }
            node = node.child_entry(segment);
            depth += 1;
        }

        if !node.is_leaf() {
            warn!(
                path = %file_path.display(),
                "digest assigned to a directory node; children take precedence"
            );
        }
        node.set_digest(digest.into());
        Ok(())
    }

    /// Compute every node's digest bottom-up. Calling it again yields the same digests.
    pub fn finalize(&mut self) {
        self.root.finalize(self.hasher.as_ref());
    }

    /// Look up a node by path, using the same rules as [`HashTree::insert`].
    /// The root path itself resolves to the root node.
    pub fn find(&self, file_path: impl AsRef<Path>) -> Option<&Node> {
        let file_path = file_path.as_ref();
        if path::clean(file_path) == self.root_path {
            return Some(&self.root);
        }

        let segments = path::relative_segments(&self.root_path, file_path)?;
        let mut node = &self.root;
        for segment in &segments {
            node = node.child(segment)?;
        }
        Some(node)
    }

    pub fn render(&self, mode: RenderMode) -> String {
        render::render(&self.root, mode)
    }

    pub fn flat_lines(&self) -> Vec<String> {
        render::flat_lines(&self.root)
    }

    pub fn indented_lines(&self) -> Vec<IndentedLine> {
        render::indented_lines(&self.root)
    }
}

impl fmt::Debug for HashTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTree").field("root", &self.root).finish()
    }
}

/// The flat view.
impl fmt::Display for HashTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderMode::Flat))
    }
}
