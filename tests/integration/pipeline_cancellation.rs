//! Integration tests for cooperative cancellation of a running build

use super::test_utils::{write_files, SlowHasher};
use std::sync::atomic::Ordering;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use treehash::concurrency::CancelToken;
use treehash::error::BuildError;
use treehash::tree::TreeBuilder;

const FILE_COUNT: usize = 200;

/// Cancelling mid-run returns promptly with no tree, and every stage has exited.
#[test]
fn test_cancel_mid_walk_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..FILE_COUNT).map(|i| format!("d{}/f{:03}", i % 7, i)).collect();
    let files: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "x")).collect();
    write_files(temp_dir.path(), &files);

    let hasher = Arc::new(SlowHasher::new(Duration::from_millis(20)));
    let builder = TreeBuilder::new(temp_dir.path())
        .with_workers(2)
        .with_content_hasher(hasher.clone());

    let cancel = CancelToken::new();
    let build_cancel = cancel.clone();
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        tx.send(builder.build(&build_cancel)).unwrap();
    });

    thread::sleep(Duration::from_millis(100));
    let cancelled_at = Instant::now();
    cancel.cancel();

    let result = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("build did not stop after cancellation");
    handle.join().unwrap();

    assert!(matches!(result, Err(BuildError::Cancelled)));
    // At most one in-flight file per worker finishes after the signal.
    assert!(cancelled_at.elapsed() < Duration::from_secs(2));
    assert!(hasher.hashed.load(Ordering::SeqCst) < FILE_COUNT);
}

/// A token cancelled before the build starts yields no result.
#[test]
fn test_cancel_before_start() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[("a", "a"), ("b", "b")]);

    let hasher = Arc::new(SlowHasher::new(Duration::from_millis(1)));
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = TreeBuilder::new(temp_dir.path())
        .with_content_hasher(hasher.clone())
        .build(&cancel);

    assert!(matches!(result, Err(BuildError::Cancelled)));
    assert_eq!(hasher.hashed.load(Ordering::SeqCst), 0);
}

/// A tiny delivery channel with many workers still completes.
#[test]
fn test_small_channel_completes() {
    let temp_dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..50).map(|i| format!("f{i}")).collect();
    let files: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), n.as_str())).collect();
    write_files(temp_dir.path(), &files);

    let tree = TreeBuilder::new(temp_dir.path())
        .with_workers(8)
        .with_channel_capacity(1)
        .build(&CancelToken::new())
        .unwrap();

    assert_eq!(tree.root().children().len(), 50);
}
