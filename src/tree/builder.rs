//! Concurrent tree builder
//!
//! Three stages connected by channels:
//!
//! 1. the [`Walker`] sends regular file paths on a bounded channel,
//! 2. `W` workers pull paths, hash them and send a [`FileHash`] per path,
//! 3. the collector (the calling thread) inserts each digest into the tree.
//!
//! The collector is the only writer of the tree. The first error raised by any
//! stage is recorded, the internal cancel token is raised, and the collector
//! keeps draining until every worker has exited. Only a run that finishes with
//! no error and no cancellation is finalized and returned.

use crate::concurrency::CancelToken;
use crate::error::{BuildError, HashError};
use crate::tree::hash_tree::HashTree;
use crate::tree::hasher::{AggregateHasher, ContentHasher, DigestAlgorithm, SortedConcatHasher};
use crate::tree::walker::{WalkOutcome, Walker};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

/// Files buffered per worker on the delivery channel.
const CHANNEL_DEPTH_PER_WORKER: usize = 4;

/// Validate a requested worker count. Values below 1 are rejected.
pub fn checked_workers(workers: i64) -> Result<usize, BuildError> {
    if workers < 1 {
        return Err(BuildError::InvalidWorkers(workers));
    }
    usize::try_from(workers).map_err(|_| BuildError::InvalidWorkers(workers))
}

/// Result of hashing one file.
#[derive(Debug)]
pub struct FileHash {
    pub path: PathBuf,
    pub digest: Result<String, HashError>,
}

/// First-error slot plus the token that tells every stage to stop.
struct Abort {
    token: CancelToken,
    error: Mutex<Option<BuildError>>,
}

impl Abort {
    fn new(parent: &CancelToken) -> Self {
        Self {
            token: parent.child_token(),
            error: Mutex::new(None),
        }
    }

    fn fail(&self, err: BuildError) {
        let mut slot = self.error.lock();
        if slot.is_none() {
            error!(error = %err, "aborting build");
            *slot = Some(err);
        } else {
            debug!(error = %err, "ignoring error after abort");
        }
        self.token.cancel();
    }

    fn has_failed(&self) -> bool {
        self.error.lock().is_some()
    }

    fn into_error(self) -> Option<BuildError> {
        self.error.into_inner()
    }
}

/// Builds a finalized [`HashTree`] for a directory.
pub struct TreeBuilder {
    root: PathBuf,
    workers: i64,
    channel_capacity: Option<usize>,
    content_hasher: Arc<dyn ContentHasher>,
    aggregate_hasher: Arc<dyn AggregateHasher>,
}

impl TreeBuilder {
    /// Builder for `root` with one worker per CPU and SHA-256 digests.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workers: num_cpus::get() as i64,
            channel_capacity: None,
            content_hasher: Arc::new(DigestAlgorithm::default()),
            aggregate_hasher: Arc::new(SortedConcatHasher::default()),
        }
    }

    /// Number of hashing workers. Values below 1 are rejected by [`TreeBuilder::build`].
    pub fn with_workers(mut self, workers: i64) -> Self {
        self.workers = workers;
        self
    }

    /// Capacity of the file delivery channel (default: 4 per worker).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity.max(1));
        self
    }

    /// Use `algorithm` for both file content and aggregates.
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.content_hasher = Arc::new(algorithm);
        self.aggregate_hasher = Arc::new(SortedConcatHasher::new(algorithm));
        self
    }

    pub fn with_content_hasher(mut self, hasher: Arc<dyn ContentHasher>) -> Self {
        self.content_hasher = hasher;
        self
    }

    pub fn with_aggregate_hasher(mut self, hasher: Arc<dyn AggregateHasher>) -> Self {
        self.aggregate_hasher = hasher;
        self
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Walk, hash and assemble the tree.
    ///
    /// Fails with the first walk, hash or insert error, or with
    /// [`BuildError::Cancelled`] when `cancel` is raised before the run completes.
    /// All stage threads have exited when this returns.
    #[instrument(skip(self, cancel), fields(root = %self.root.display()))]
    pub fn build(&self, cancel: &CancelToken) -> Result<HashTree, BuildError> {
        let workers = checked_workers(self.workers)?;
        let start = Instant::now();
        info!(workers, "Starting tree build");

        let capacity = self
            .channel_capacity
            .unwrap_or(workers * CHANNEL_DEPTH_PER_WORKER);
        let (file_tx, file_rx) = crossbeam_channel::bounded::<PathBuf>(capacity);
        let (hash_tx, hash_rx) = crossbeam_channel::unbounded::<FileHash>();

        let abort = Abort::new(cancel);
        let mut tree = HashTree::new(&self.root, Arc::clone(&self.aggregate_hasher));
        let walker = Walker::new(self.root.clone());
        let content_hasher = self.content_hasher.as_ref();

        let collected = thread::scope(|scope| {
            let abort = &abort;
            let walker = &walker;

            let walk_handle = thread::Builder::new()
                .name("treehash-walker".to_string())
                .spawn_scoped(scope, move || {
                    let outcome = walker.walk(&abort.token, &file_tx);
                    // file_tx drops here, letting workers drain and exit.
                    match outcome {
                        Ok(outcome) => Some(outcome),
                        Err(err) => {
                            abort.fail(err);
                            None
                        }
                    }
                });
            let walk_handle = match walk_handle {
                Ok(handle) => Some(handle),
                Err(source) => {
                    abort.fail(BuildError::Spawn {
                        stage: "walker",
                        source,
                    });
                    None
                }
            };

            let mut worker_handles = Vec::with_capacity(workers);
            for id in 0..workers {
                let files = file_rx.clone();
                let results = hash_tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("treehash-worker-{id}"))
                    .spawn_scoped(scope, move || {
                        hash_worker(id, content_hasher, &abort.token, files, results)
                    });
                match spawned {
                    Ok(handle) => worker_handles.push(handle),
                    Err(source) => {
                        abort.fail(BuildError::Spawn {
                            stage: "worker",
                            source,
                        });
                        break;
                    }
                }
            }
            // Only the stages hold channel ends from here on.
            drop(file_rx);
            drop(hash_tx);

            let collected = collect(&mut tree, &hash_rx, abort);

            if let Some(handle) = walk_handle {
                match handle.join() {
                    Ok(Some(WalkOutcome::Completed { files })) => {
                        debug!(files, "walker finished")
                    }
                    Ok(Some(WalkOutcome::Stopped { files })) => {
                        debug!(files, "walker stopped early")
                    }
                    Ok(None) => {}
                    Err(_) => abort.fail(BuildError::StagePanicked("walker")),
                }
            }
            for handle in worker_handles {
                if handle.join().is_err() {
                    abort.fail(BuildError::StagePanicked("worker"));
                }
            }
            collected
        });

        if let Some(err) = abort.into_error() {
            return Err(err);
        }
        if cancel.is_cancelled() {
            warn!(files = collected, "tree build cancelled");
            return Err(BuildError::Cancelled);
        }

        tree.finalize();

        info!(
            file_count = collected,
            node_count = tree.node_count(),
            root_digest = tree.root_digest().unwrap_or_default(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tree build completed"
        );
        Ok(tree)
    }
}

/// Worker loop: hash files until the channel closes or cancellation is observed.
///
/// Cancellation is checked between files only; a file in progress is read to the end.
fn hash_worker(
    id: usize,
    hasher: &dyn ContentHasher,
    cancel: &CancelToken,
    files: Receiver<PathBuf>,
    results: Sender<FileHash>,
) {
    let mut hashed = 0usize;
    for path in files.iter() {
        if cancel.is_cancelled() {
            break;
        }
        trace!(worker = id, path = %path.display(), "hashing file");
        let digest = hasher.hash_file(&path);
        if results.send(FileHash { path, digest }).is_err() {
            break;
        }
        hashed += 1;
    }
    debug!(worker = id, files = hashed, "worker exiting");
}

/// Drain every result, inserting successes until the first failure.
/// Returns the number of digests inserted.
fn collect(tree: &mut HashTree, results: &Receiver<FileHash>, abort: &Abort) -> usize {
    let mut inserted = 0usize;
    for result in results.iter() {
        if abort.has_failed() {
            continue;
        }
        match result.digest {
            Ok(digest) => match tree.insert(&result.path, digest) {
                Ok(()) => inserted += 1,
                Err(err) => abort.fail(err.into()),
            },
            Err(err) => abort.fail(err.into()),
        }
    }
    inserted
}
