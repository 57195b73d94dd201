//! CLI output: error mapping and the nested list view.

use crate::error::ApiError;
use crate::tree::render::IndentedLine;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    e.to_string()
}

/// Draw indented lines as a connected list with rounded corners.
///
/// Depth 0 lines are printed as-is; deeper lines get one `│  ` column per open
/// ancestor and a `├─ ` or `╰─ ` connector.
pub fn render_tree_view(lines: &[IndentedLine]) -> String {
    let mut is_last = vec![false; lines.len()];
    let mut later_sibling: Vec<bool> = Vec::new();
    for (i, line) in lines.iter().enumerate().rev() {
        is_last[i] = !later_sibling.get(line.depth).copied().unwrap_or(false);
        later_sibling.truncate(line.depth + 1);
        later_sibling.resize(line.depth + 1, false);
        later_sibling[line.depth] = true;
    }

    let mut out = String::new();
    let mut open: Vec<bool> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        open.truncate(line.depth);
        if line.depth > 0 {
            for &ancestor_last in open.iter().skip(1) {
                out.push_str(if ancestor_last { "   " } else { "│  " });
            }
            out.push_str(if is_last[i] { "╰─ " } else { "├─ " });
        }
        out.push_str(&line.text);
        out.push('\n');
        open.push(is_last[i]);
    }
    out.pop();
    out
}
