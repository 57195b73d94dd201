//! Textual views of a finalized tree
//!
//! Both views print `"<digest> <label>"` per node, with a trailing `/` on
//! internal nodes. The flat view is breadth-first with accumulated path labels;
//! the indented view is depth-first with bare names and an explicit depth.

use crate::tree::node::Node;
use serde::{Deserialize, Serialize};

/// Which view to produce.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Level-order lines with full relative paths
    #[default]
    Flat,
    /// Depth-first nested listing
    #[value(name = "tree", alias = "indented")]
    #[serde(rename = "tree", alias = "indented")]
    Indented,
}

/// One line of the indented view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentedLine {
    /// Nesting depth, 0 for the root
    pub depth: usize,
    /// `"<digest> <name>[/]"`
    pub text: String,
}

fn label(prefix: &str, node: &Node) -> String {
    if node.is_leaf() {
        format!("{}{}", prefix, node.name().to_string_lossy())
    } else {
        format!("{}{}/", prefix, node.name().to_string_lossy())
    }
}

fn line(node: &Node, label: &str) -> String {
    format!("{} {}", node.digest().unwrap_or_default(), label)
}

/// Breadth-first lines. Each level is sorted on the whole line, so digest
/// order decides within a level and the path only breaks ties.
pub fn flat_lines(root: &Node) -> Vec<String> {
    let mut output = Vec::with_capacity(root.node_count());
    let mut level: Vec<(String, &Node)> = vec![(String::new(), root)];

    while !level.is_empty() {
        let mut next = Vec::new();
        let mut lines = Vec::with_capacity(level.len());

        for (prefix, node) in level {
            let label = label(&prefix, node);
            lines.push(line(node, &label));
            for child in node.children() {
                next.push((label.clone(), child));
            }
        }

        lines.sort();
        output.extend(lines);
        level = next;
    }

    output
}

/// Pre-order lines with siblings in ascending name order.
pub fn indented_lines(root: &Node) -> Vec<IndentedLine> {
    let mut output = Vec::with_capacity(root.node_count());
    push_indented(root, 0, &mut output);
    output
}

fn push_indented(node: &Node, depth: usize, output: &mut Vec<IndentedLine>) {
    output.push(IndentedLine {
        depth,
        text: line(node, &label("", node)),
    });
    for child in node.children() {
        push_indented(child, depth + 1, output);
    }
}

/// Render a view as newline-joined text. The indented view uses two spaces per level.
pub fn render(root: &Node, mode: RenderMode) -> String {
    match mode {
        RenderMode::Flat => flat_lines(root).join("\n"),
        RenderMode::Indented => indented_lines(root)
            .iter()
            .map(|line| format!("{}{}", "  ".repeat(line.depth), line.text))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
