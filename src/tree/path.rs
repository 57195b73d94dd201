//! Lexical path cleaning and root-relative segmentation
//!
//! Nothing here touches the filesystem: symlinks are not resolved, so the
//! result depends only on the path text.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Lexically clean a path.
///
/// 1. Drops `.` components and repeated or trailing separators
/// 2. Folds `name/..` pairs
/// 3. Drops `..` directly after the root (`/..` is `/`)
/// 4. Returns `.` for a path that cleans to nothing
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Raw segments of `path` below `root`, or `None` when `path` is not a strict
/// descendant of `root` once both are cleaned. Names are kept byte-exact.
pub fn relative_segments(root: &Path, path: &Path) -> Option<Vec<OsString>> {
    let root = clean(root);
    let path = clean(path);

    let rest = if root == Path::new(".") {
        if path.has_root() || path == Path::new(".") {
            return None;
        }
        path
    } else {
        path.strip_prefix(&root).ok()?.to_path_buf()
    };

    let mut segments = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_os_string()),
            _ => return None,
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}
