//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use std::collections::BTreeMap;
use proptest::test_runner::TestCaseError;
use treehash::tree::{AggregateHasher, DigestAlgorithm, HashTree, Node, SortedConcatHasher};

/// Relative file paths up to three segments deep over a small alphabet,
/// so that directories are shared between paths.
fn file_paths() -> impl Strategy<Value = BTreeMap<String, String>> {
    let segment = "[a-d]{1,2}";
    let path = prop::collection::vec(segment, 1..=3).prop_map(|segments| segments.join("/"));
    prop::collection::btree_map(path, "[0-9a-f]{8}", 1..24)
}

/// Drop paths that are a strict prefix directory of another path; real
/// filesystems cannot have a file and a directory under one name.
fn without_conflicts(files: BTreeMap<String, String>) -> Vec<(String, String)> {
    let keys: Vec<String> = files.keys().cloned().collect();
    files
        .into_iter()
        .filter(|(path, _)| {
            let dir = format!("{path}/");
            !keys.iter().any(|other| other.starts_with(&dir))
        })
        .collect()
}

fn build(root: &str, files: &[(String, String)]) -> HashTree {
    let mut tree = HashTree::with_default_hasher(root);
    for (path, digest) in files {
        tree.insert(format!("{root}/{path}"), digest.clone()).unwrap();
    }
    tree.finalize();
    tree
}

/// Check the digest rule at `node` and every internal node below it: one
/// child passes its digest through, two or more are aggregated.
fn check_aggregation(node: &Node, hasher: &SortedConcatHasher) -> Result<(), TestCaseError> {
    if node.is_leaf() {
        return Ok(());
    }

    let child_digests: Vec<String> = node
        .children()
        .map(|child| child.digest().unwrap_or_default().to_string())
        .collect();
    if child_digests.len() == 1 {
        prop_assert_eq!(node.digest(), Some(child_digests[0].as_str()));
    } else {
        let mut sorted = child_digests.clone();
        sorted.sort();
        let expected = hasher.hash(&sorted);
        prop_assert_eq!(node.digest(), Some(expected.as_str()));
    }

    for child in node.children() {
        check_aggregation(child, hasher)?;
    }
    Ok(())
}

proptest! {
    /// Insertion order never changes digests or rendered output.
    #[test]
    fn test_insertion_order_invariance(
        (files, shuffled) in file_paths()
            .prop_map(without_conflicts)
            .prop_flat_map(|files| {
                let shuffled = Just(files.clone()).prop_shuffle();
                (Just(files), shuffled)
            })
    ) {
        let first = build("root", &files);
        let second = build("root", &shuffled);

        prop_assert_eq!(first.root_digest(), second.root_digest());
        prop_assert_eq!(first.flat_lines(), second.flat_lines());
        prop_assert_eq!(first.indented_lines(), second.indented_lines());
    }

    /// The aggregate digest ignores the order of its inputs.
    #[test]
    fn test_aggregate_order_invariance(
        (inputs, shuffled) in prop::collection::vec("[0-9a-f]{4,16}", 2..10)
            .prop_flat_map(|inputs| {
                let shuffled = Just(inputs.clone()).prop_shuffle();
                (Just(inputs), shuffled)
            })
    ) {
        for algorithm in [DigestAlgorithm::Sha256, DigestAlgorithm::Blake3] {
            let hasher = SortedConcatHasher::new(algorithm);
            prop_assert_eq!(hasher.hash(&inputs), hasher.hash(&shuffled));
        }
    }

    /// Every inserted file is reachable and keeps its own digest.
    #[test]
    fn test_leaves_keep_their_digest(files in file_paths().prop_map(without_conflicts)) {
        let tree = build("root", &files);
        for (path, digest) in &files {
            let node = tree.find(format!("root/{path}"));
            prop_assert!(node.is_some());
            let node = node.unwrap();
            prop_assert!(node.is_leaf());
            prop_assert_eq!(node.digest(), Some(digest.as_str()));
        }
    }

    /// Re-finalizing a finalized tree leaves every digest unchanged.
    #[test]
    fn test_finalize_is_idempotent(files in file_paths().prop_map(without_conflicts)) {
        let mut tree = build("root", &files);
        let before = tree.flat_lines();
        tree.finalize();
        prop_assert_eq!(before, tree.flat_lines());
    }

    /// Every internal node follows the pass-through or aggregate rule.
    #[test]
    fn test_internal_digests_follow_child_count(files in file_paths().prop_map(without_conflicts)) {
        let tree = build("root", &files);
        check_aggregation(tree.root(), &SortedConcatHasher::default())?;
    }
}
