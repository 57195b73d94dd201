//! Filesystem Merkle Tree
//!
//! Every regular file below a root is hashed; every directory's digest is
//! derived from its children's digests, giving one root digest for the whole
//! subtree's content and structure.

pub mod builder;
pub mod hash_tree;
pub mod hasher;
pub mod node;
pub mod path;
pub mod render;
pub mod walker;

pub use builder::{FileHash, TreeBuilder};
pub use hash_tree::HashTree;
pub use hasher::{AggregateHasher, ContentHasher, DigestAlgorithm, SortedConcatHasher};
pub use node::Node;
pub use render::{IndentedLine, RenderMode};
