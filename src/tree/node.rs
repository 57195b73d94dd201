//! Tree node types

use crate::tree::hasher::AggregateHasher;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// One path segment of the tree: a file, or a directory with children.
///
/// A node is a leaf iff it has no children, whether or not a digest was ever
/// assigned to it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: OsString,
    // Byte order of the raw names; the renderers rely on it.
    children: BTreeMap<OsString, Node>,
    digest: Option<String>,
}

impl Node {
    pub(crate) fn new(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
            digest: None,
        }
    }

    /// Raw path segment; the root carries the cleaned scan root.
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Hex digest, unset on internal nodes until the tree is finalized.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: impl AsRef<OsStr>) -> Option<&Node> {
        self.children.get(name.as_ref())
    }

    /// Children in ascending name order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = &Node> {
        self.children.values()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(Node::node_count).sum::<usize>()
    }

    pub(crate) fn child_entry(&mut self, name: impl Into<OsString>) -> &mut Node {
        self.children
            .entry(name.into())
            .or_insert_with_key(|name| Node::new(name.clone()))
    }

    pub(crate) fn set_digest(&mut self, digest: String) {
        self.digest = Some(digest);
    }

    /// Recompute digests bottom-up and return this node's digest.
    ///
    /// Leaves keep their assigned digest. A node with one child inherits that
    /// child's digest; any other internal node aggregates its children. A
    /// digest assigned directly to a node that has children is replaced.
    pub(crate) fn finalize(&mut self, hasher: &dyn AggregateHasher) -> Option<String> {
        if self.is_leaf() {
            return self.digest.clone();
        }

        let mut digests: Vec<String> = self
            .children
            .values_mut()
            .filter_map(|child| child.finalize(hasher))
            .collect();

        let digest = if digests.len() == 1 {
            digests.pop()
        } else {
            Some(hasher.hash(&digests))
        };
        self.digest = digest.clone();
        digest
    }
}
