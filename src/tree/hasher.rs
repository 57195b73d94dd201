//! Content and aggregate hashing for tree nodes
//!
//! Leaves carry the digest of their file's bytes; internal nodes carry an
//! aggregate of their children's digests. Both are lowercase hex strings.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Digest algorithm used for file content and aggregates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Blake3,
}

impl DigestAlgorithm {
    /// Stream `reader` to EOF through the digest and return it hex encoded.
    pub fn digest_reader<R: Read>(self, mut reader: R) -> io::Result<String> {
        match self {
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                io::copy(&mut reader, &mut hasher)?;
                Ok(hex::encode(hasher.finalize()))
            }
            DigestAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                io::copy(&mut reader, &mut hasher)?;
                Ok(hex::encode(hasher.finalize().as_bytes()))
            }
        }
    }

    /// Digest of an in-memory byte slice.
    pub fn digest_bytes(self, data: &[u8]) -> String {
        match self {
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
            DigestAlgorithm::Blake3 => hex::encode(blake3::hash(data).as_bytes()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Blake3 => "blake3",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the content digest of a single file.
///
/// Implementations must read the whole file or fail; a partial digest is never returned.
pub trait ContentHasher: Send + Sync {
    fn hash_file(&self, path: &Path) -> Result<String, HashError>;
}

impl ContentHasher for DigestAlgorithm {
    fn hash_file(&self, path: &Path) -> Result<String, HashError> {
        let file = File::open(path).map_err(|e| HashError::new(path, e))?;
        // The handle is closed on drop; std offers no fallible close.
        self.digest_reader(BufReader::new(file))
            .map_err(|e| HashError::new(path, e))
    }
}

/// Combines child digests into one digest.
///
/// The tree never calls this with a single digest: one-child nodes inherit
/// their child's digest unchanged.
pub trait AggregateHasher: Send + Sync {
    fn hash(&self, digests: &[String]) -> String;
}

/// Sorts the inputs, concatenates them and digests the result.
///
/// Sorting makes the aggregate independent of child discovery order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedConcatHasher {
    algorithm: DigestAlgorithm,
}

impl SortedConcatHasher {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl AggregateHasher for SortedConcatHasher {
    fn hash(&self, digests: &[String]) -> String {
        let mut sorted: Vec<&str> = digests.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        match self.algorithm {
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                for digest in sorted {
                    hasher.update(digest.as_bytes());
                }
                hex::encode(hasher.finalize())
            }
            DigestAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for digest in sorted {
                    hasher.update(digest.as_bytes());
                }
                hex::encode(hasher.finalize().as_bytes())
            }
        }
    }
}
