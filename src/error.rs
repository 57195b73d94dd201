//! Error types for the treehash digest pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Structural misuse of [`HashTree::insert`](crate::tree::hash_tree::HashTree::insert).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("empty filepath")]
    EmptyPath,

    #[error("filepath not relative to root: {path:?} (root: {root:?})")]
    NotRelative { path: PathBuf, root: PathBuf },
}

/// Failure to read one file while computing its content digest.
#[derive(Debug, Error)]
#[error("failed to hash {path:?}: {source}")]
pub struct HashError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl HashError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}

/// Pipeline-level errors. The first one raised aborts the whole build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid worker count {0}: must be greater than 0")]
    InvalidWorkers(i64),

    #[error("scan root is not a directory: {0:?}")]
    RootNotDirectory(PathBuf),

    #[error("failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("build cancelled")]
    Cancelled,

    #[error("failed to spawn {stage} thread: {source}")]
    Spawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} thread panicked")]
    StagePanicked(&'static str),
}

/// Errors surfaced by the configuration, logging and CLI layers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
