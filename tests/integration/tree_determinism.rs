//! Integration tests for tree building determinism

use super::test_utils::write_files;
use std::fs;
use treehash::concurrency::CancelToken;
use treehash::tree::{DigestAlgorithm, RenderMode, TreeBuilder};
use tempfile::TempDir;

fn sample(root: &std::path::Path) {
    write_files(
        root,
        &[
            ("file1.txt", "content1"),
            ("file2.txt", "content2"),
            ("dir1/file3.txt", "content3"),
            ("dir1/sub/file4.txt", "content4"),
            ("dir2/file5.txt", "content5"),
        ],
    );
}

/// Same filesystem gives the same output for any worker count.
#[test]
fn test_worker_count_does_not_change_output() {
    let temp_dir = TempDir::new().unwrap();
    sample(temp_dir.path());

    let outputs: Vec<(String, String)> = [1, 2, 8]
        .into_iter()
        .map(|workers| {
            let tree = TreeBuilder::new(temp_dir.path())
                .with_workers(workers)
                .build(&CancelToken::new())
                .unwrap();
            (tree.render(RenderMode::Flat), tree.render(RenderMode::Indented))
        })
        .collect();

    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

/// Two directories with identical content have identical root digests,
/// regardless of where they live.
#[test]
fn test_same_content_same_root_digest() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    sample(first.path());
    sample(second.path());

    let a = TreeBuilder::new(first.path()).build(&CancelToken::new()).unwrap();
    let b = TreeBuilder::new(second.path()).build(&CancelToken::new()).unwrap();

    assert_eq!(a.root_digest(), b.root_digest());
}

/// Changing one file changes every ancestor digest.
#[test]
fn test_content_change_propagates_to_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    sample(root);

    let before = TreeBuilder::new(root).build(&CancelToken::new()).unwrap();
    fs::write(root.join("dir1/sub/file4.txt"), "changed").unwrap();
    let after = TreeBuilder::new(root).build(&CancelToken::new()).unwrap();

    assert_ne!(before.root_digest(), after.root_digest());
    assert_ne!(
        before.find(root.join("dir1")).unwrap().digest(),
        after.find(root.join("dir1")).unwrap().digest()
    );
    assert_eq!(
        before.find(root.join("dir2")).unwrap().digest(),
        after.find(root.join("dir2")).unwrap().digest()
    );
}

/// The algorithm choice changes every digest.
#[test]
fn test_algorithm_changes_root() {
    let temp_dir = TempDir::new().unwrap();
    sample(temp_dir.path());

    let sha = TreeBuilder::new(temp_dir.path())
        .with_algorithm(DigestAlgorithm::Sha256)
        .build(&CancelToken::new())
        .unwrap();
    let blake = TreeBuilder::new(temp_dir.path())
        .with_algorithm(DigestAlgorithm::Blake3)
        .build(&CancelToken::new())
        .unwrap();

    assert_ne!(sha.root_digest(), blake.root_digest());
    assert_eq!(blake.root_digest().unwrap().len(), 64);
}
