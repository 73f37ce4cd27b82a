//! Path utilities
//!
//! Pure functions over the slash-delimited path namespace. A trailing `/`
//! denotes a folder, absence denotes a file. Segment characters are
//! validated upstream; these functions never perform I/O.

/// Split a path into ordered segments. Each segment retains its trailing
/// separator except a final file segment.
///
/// `"/a/b/c.txt"` yields `["/", "a/", "b/", "c.txt"]`;
/// `"/a/b/"` yields `["/", "a/", "b/"]`.
pub fn segments(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for ch in path.chars() {
        current.push(ch);
        if ch == '/' {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Full-path ancestor chain, from the immediate parent down to the root
/// `"/"`, optionally prefixed with the path itself.
///
/// `ancestors("/a/b/c.txt", false)` yields `["/a/b/", "/a/", "/"]`.
pub fn ancestors(path: &str, include_self: bool) -> Vec<String> {
    let mut segs = segments(path);
    let mut chain = Vec::new();
    if include_self {
        chain.push(segs.concat());
    }
    segs.pop();
    while !segs.is_empty() {
        chain.push(segs.concat());
        segs.pop();
    }
    chain
}

/// Whether the path denotes a folder.
pub fn is_folder(path: &str) -> bool {
    path.ends_with('/')
}

/// Full path of the immediate parent folder, or `None` for the root.
pub fn parent(path: &str) -> Option<String> {
    let mut segs = segments(path);
    segs.pop()?;
    if segs.is_empty() {
        return None;
    }
    Some(segs.concat())
}

/// Last segment of the path (a file name, or a folder name with its
/// trailing `/`).
pub fn basename(path: &str) -> Option<String> {
    segments(path).pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_segments_file_path() {
        assert_eq!(segments("/a/b/c.txt"), vec!["/", "a/", "b/", "c.txt"]);
    }

    #[test]
    fn test_segments_folder_path() {
        assert_eq!(segments("/a/b/"), vec!["/", "a/", "b/"]);
    }

    #[test]
    fn test_segments_root() {
        assert_eq!(segments("/"), vec!["/"]);
    }

    #[test]
    fn test_ancestors_of_file() {
        assert_eq!(ancestors("/a/b/c.txt", false), vec!["/a/b/", "/a/", "/"]);
    }

    #[test]
    fn test_ancestors_include_self() {
        assert_eq!(
            ancestors("/a/b/", true),
            vec!["/a/b/", "/a/", "/"]
        );
    }

    #[test]
    fn test_ancestors_of_top_level_file() {
        assert_eq!(ancestors("/x", false), vec!["/"]);
    }

    #[test]
    fn test_parent_and_basename() {
        assert_eq!(parent("/a/b/c.txt").as_deref(), Some("/a/b/"));
        assert_eq!(parent("/a/").as_deref(), Some("/"));
        assert_eq!(parent("/"), None);
        assert_eq!(basename("/a/b/c.txt").as_deref(), Some("c.txt"));
        assert_eq!(basename("/a/b/").as_deref(), Some("b/"));
    }

    #[test]
    fn test_is_folder() {
        assert!(is_folder("/a/b/"));
        assert!(!is_folder("/a/b"));
    }

    fn arb_path() -> impl Strategy<Value = String> {
        (
            proptest::collection::vec("[a-z0-9._-]{1,8}", 1..6),
            proptest::bool::ANY,
        )
            .prop_map(|(segs, folder)| {
                let mut path = String::from("/");
                path.push_str(&segs.join("/"));
                if folder {
                    path.push('/');
                }
                path
            })
    }

    proptest! {
        #[test]
        fn prop_segments_concat_roundtrips(path in arb_path()) {
            prop_assert_eq!(segments(&path).concat(), path);
        }

        #[test]
        fn prop_ancestors_are_folders_ending_at_root(path in arb_path()) {
            let chain = ancestors(&path, false);
            prop_assert_eq!(chain.last().map(String::as_str), Some("/"));
            for ancestor in &chain {
                prop_assert!(ancestor.ends_with('/'));
                prop_assert!(path.starts_with(ancestor.as_str()));
            }
        }

        #[test]
        fn prop_each_ancestor_is_parent_of_previous(path in arb_path()) {
            let chain = ancestors(&path, true);
            for pair in chain.windows(2) {
                let parent_of_first = parent(&pair[0]);
                prop_assert_eq!(parent_of_first.as_deref(), Some(pair[1].as_str()));
            }
        }
    }
}
