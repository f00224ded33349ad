//! Directory-tree summarization.
//!
//! Works from an ordinary list of paths supplied by the caller; no filesystem
//! traversal happens here. The root is the longest common path prefix shared
//! by all inputs (segment-wise, so `/a/bc` and `/a/bcd` share `/a`, not
//! `/a/bc`), unless the caller names one explicitly.

use std::collections::BTreeMap;

use crate::domain::StashError;
use crate::utils::normalize_path;

/// Nested mapping keyed by path segment. `BTreeMap` keeps sibling iteration
/// sorted, which makes rendering byte-identical across runs.
#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

/// Render a sorted tree for `paths`, prefixed with a `Root: <root>` line.
pub fn build_tree(paths: &[String], explicit_root: Option<&str>) -> Result<String, StashError> {
    if paths.is_empty() {
        return Err(StashError::EmptyPathList);
    }

    let normalized: Vec<String> = paths.iter().map(|p| normalize_path(p)).collect();
    let segmented: Vec<Vec<&str>> = normalized.iter().map(|p| segments(p)).collect();
    let absolute = normalized[0].starts_with('/');

    let root_segments: Vec<String> = match explicit_root {
        Some(root) => {
            let normalized_root = normalize_path(root);
            segments(&normalized_root).into_iter().map(str::to_string).collect()
        }
        None => common_prefix(&segmented),
    };

    let mut root = Node::default();
    for path_segments in &segmented {
        let relative = strip_root(path_segments, &root_segments);
        let mut node = &mut root;
        for segment in relative {
            node = node.children.entry(segment.to_string()).or_default();
        }
    }

    let root_display = if absolute {
        format!("/{}", root_segments.join("/"))
    } else {
        root_segments.join("/")
    };

    let mut lines = vec![format!("Root: {root_display}")];
    render(&root, "", &mut lines);
    Ok(lines.join("\n"))
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Longest segment prefix shared by all paths. When the prefix coincides with
/// a full input path (a single path, or identical paths), root at its parent
/// instead so the entry itself still renders.
fn common_prefix(segmented: &[Vec<&str>]) -> Vec<String> {
    let first = &segmented[0];
    let mut prefix_len = first.len();
    for other in &segmented[1..] {
        let shared = first
            .iter()
            .zip(other.iter())
            .take_while(|(a, b)| a == b)
            .count();
        prefix_len = prefix_len.min(shared);
    }
    if segmented.iter().any(|path| path.len() == prefix_len) {
        prefix_len = prefix_len.saturating_sub(1);
    }
    first[..prefix_len].iter().map(|s| s.to_string()).collect()
}

fn strip_root<'a>(path_segments: &'a [&'a str], root: &[String]) -> &'a [&'a str] {
    let under_root = path_segments.len() >= root.len()
        && path_segments.iter().zip(root.iter()).all(|(a, b)| a == b);
    if under_root {
        &path_segments[root.len()..]
    } else {
        path_segments
    }
}

fn render(node: &Node, prefix: &str, lines: &mut Vec<String>) {
    let total = node.children.len();
    for (idx, (name, child)) in node.children.iter().enumerate() {
        let is_last = idx == total - 1;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{name}"));
        if !child.children.is_empty() {
            let extension = if is_last { "    " } else { "│   " };
            render(child, &format!("{prefix}{extension}"), lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(build_tree(&[], None), Err(StashError::EmptyPathList)));
    }

    #[test]
    fn siblings_sort_alphabetically_regardless_of_input_order() {
        let forward = build_tree(
            &["/a/b/x.ts".to_string(), "/a/c/y.ts".to_string()],
            None,
        )
        .expect("tree");
        let reversed = build_tree(
            &["/a/c/y.ts".to_string(), "/a/b/x.ts".to_string()],
            None,
        )
        .expect("tree");
        assert_eq!(forward, reversed);
        assert!(forward.starts_with("Root: /a\n"));
        let b_pos = forward.find("b").expect("b present");
        let c_pos = forward.find("c").expect("c present");
        assert!(b_pos < c_pos);
    }

    #[test]
    fn common_prefix_is_segment_wise_not_character_wise() {
        let tree = build_tree(&["/a/bc/x".to_string(), "/a/bcd/y".to_string()], None)
            .expect("tree");
        assert!(tree.starts_with("Root: /a\n"));
        assert!(tree.contains("bc"));
        assert!(tree.contains("bcd"));
    }

    #[test]
    fn single_path_roots_at_parent_directory() {
        let tree = build_tree(&["/home/me/src/main.rs".to_string()], None).expect("tree");
        assert_eq!(tree, "Root: /home/me/src\n└── main.rs");
    }

    #[test]
    fn identical_paths_root_at_parent_like_a_single_path() {
        let tree = build_tree(
            &["/a/b/x.rs".to_string(), "/a/b/x.rs".to_string()],
            None,
        )
        .expect("tree");
        assert_eq!(tree, "Root: /a/b\n└── x.rs");
    }

    #[test]
    fn path_equal_to_the_common_prefix_still_renders() {
        let tree = build_tree(&["/a/b".to_string(), "/a/b/c".to_string()], None).expect("tree");
        assert_eq!(tree, "Root: /a\n└── b\n    └── c");
    }

    #[test]
    fn explicit_root_overrides_inference() {
        let tree = build_tree(
            &["/repo/src/a.rs".to_string(), "/repo/src/b.rs".to_string()],
            Some("/repo"),
        )
        .expect("tree");
        assert!(tree.starts_with("Root: /repo\n"));
        assert!(tree.contains("└── src"));
    }

    #[test]
    fn branch_markers_and_indentation() {
        let tree = build_tree(
            &[
                "/r/pkg/deep/one.rs".to_string(),
                "/r/pkg/two.rs".to_string(),
                "/r/zzz.rs".to_string(),
            ],
            Some("/r"),
        )
        .expect("tree");
        let expected = "Root: /r\n\
                        ├── pkg\n\
                        │   ├── deep\n\
                        │   │   └── one.rs\n\
                        │   └── two.rs\n\
                        └── zzz.rs";
        assert_eq!(tree, expected);
    }

    #[test]
    fn windows_separators_are_normalized() {
        let tree = build_tree(
            &[r"C:\work\src\a.rs".to_string(), r"C:\work\src\b.rs".to_string()],
            None,
        )
        .expect("tree");
        assert!(tree.starts_with("Root: C:/work/src"));
        assert!(tree.contains("a.rs"));
    }
}
