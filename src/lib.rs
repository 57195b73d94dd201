//! Treehash: Content-Addressed Directory Digests
//!
//! Hashes every regular file below a root in parallel and folds the results
//! into a Merkle tree whose root digest identifies the whole subtree.

pub mod cli;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod logging;
pub mod tree;
