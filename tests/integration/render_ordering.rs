//! Integration tests for the flat and indented views of a built tree

use super::test_utils::write_files;
use tempfile::TempDir;
use treehash::concurrency::CancelToken;
use treehash::tree::{HashTree, RenderMode, TreeBuilder};

fn build(root: &std::path::Path, workers: i64) -> HashTree {
    TreeBuilder::new(root)
        .with_workers(workers)
        .build(&CancelToken::new())
        .unwrap()
}

fn sample(root: &std::path::Path) {
    write_files(
        root,
        &[
            ("zeta", "1"),
            ("alpha/one", "2"),
            ("alpha/two", "3"),
            ("mid/deep/leaf", "4"),
            ("mid/other", "5"),
        ],
    );
}

/// The flat view starts with the root and is sorted within each level.
#[test]
fn test_flat_levels_sorted_by_line() {
    let temp_dir = TempDir::new().unwrap();
    sample(temp_dir.path());
    let tree = build(temp_dir.path(), 3);

    let lines = tree.flat_lines();
    assert_eq!(lines.len(), tree.node_count());
    assert!(lines[0].ends_with('/'));
    assert!(lines[0].starts_with(tree.root_digest().unwrap()));

    // Level sizes: root, {alpha, mid, zeta}, {one, two, deep, other}, {leaf}
    let levels = [1usize, 3, 4, 1];
    let mut offset = 0;
    for size in levels {
        let level = &lines[offset..offset + size];
        let mut sorted = level.to_vec();
        sorted.sort();
        assert_eq!(level, sorted.as_slice());
        offset += size;
    }
    assert_eq!(offset, lines.len());
}

/// Flat labels accumulate the path of their ancestors.
#[test]
fn test_flat_labels_carry_parent_path() {
    let temp_dir = TempDir::new().unwrap();
    sample(temp_dir.path());
    let tree = build(temp_dir.path(), 2);

    let root_label = format!("{}/", tree.root().name().to_string_lossy());
    let lines = tree.flat_lines();
    assert!(lines
        .iter()
        .any(|l| l.ends_with(&format!(" {root_label}mid/deep/leaf"))));
    assert!(lines
        .iter()
        .any(|l| l.ends_with(&format!(" {root_label}alpha/"))));
}

/// The indented view is pre-order with siblings by name and bare labels.
#[test]
fn test_indented_preorder_by_name() {
    let temp_dir = TempDir::new().unwrap();
    sample(temp_dir.path());
    let tree = build(temp_dir.path(), 4);

    let labels: Vec<(usize, String)> = tree
        .indented_lines()
        .into_iter()
        .map(|line| {
            let (_, label) = line.text.split_once(' ').unwrap();
            (line.depth, label.to_string())
        })
        .collect();

    let expected = vec![
        (1, "alpha/"),
        (2, "one"),
        (2, "two"),
        (1, "mid/"),
        (2, "deep/"),
        (3, "leaf"),
        (2, "other"),
        (1, "zeta"),
    ];
    assert_eq!(labels[0].0, 0);
    let rest: Vec<(usize, &str)> = labels[1..].iter().map(|(d, l)| (*d, l.as_str())).collect();
    assert_eq!(rest, expected);
}

/// Two builds of the same content render byte-for-byte identically.
#[test]
fn test_render_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    sample(temp_dir.path());

    let first = build(temp_dir.path(), 1);
    let second = build(temp_dir.path(), 8);
    for mode in [RenderMode::Flat, RenderMode::Indented] {
        assert_eq!(first.render(mode), second.render(mode));
    }
}
