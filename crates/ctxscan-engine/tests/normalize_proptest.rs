//! Property tests for path normalization.

use std::path::Path;

use ctxscan_engine::path::{PathNormalizer, RelativePath};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z0-9_-]{1,8}",
        1 => Just(".".to_string()),
        1 => Just("..".to_string()),
        1 => Just(String::new()),
    ]
}

fn raw_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(segment(), 0..8),
        prop::bool::ANY,
        prop::bool::ANY,
        prop::option::of("[a-zA-Z]"),
    )
        .prop_map(|(segments, absolute, backslashes, drive)| {
            let sep = if backslashes { "\\" } else { "/" };
            let mut path = drive.map(|d| format!("{d}:")).unwrap_or_default();
            if absolute {
                path.push_str(sep);
            }
            path.push_str(&segments.join(sep));
            path
        })
}

fn normalizer(windows: bool) -> PathNormalizer {
    if windows {
        PathNormalizer::windows()
    } else {
        PathNormalizer::posix()
    }
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in raw_path(), windows in prop::bool::ANY) {
        let n = normalizer(windows);
        let once = n.normalize_str(&raw);
        prop_assert_eq!(n.normalize_str(&once), once.clone());
        if windows {
            prop_assert!(!once.contains('\\'));
        }
    }

    #[test]
    fn posix_preserves_backslashes(raw in raw_path()) {
        let once = PathNormalizer::posix().normalize_str(&raw);
        prop_assert_eq!(once.matches('\\').count(), raw.matches('\\').count());
    }

    #[test]
    fn relative_paths_are_never_absolute_or_escaping(
        root in prop::collection::vec("[a-z]{1,6}", 1..4),
        raw in raw_path(),
        windows in prop::bool::ANY,
    ) {
        let n = normalizer(windows);
        let root = format!("/{}", root.join("/"));
        match n.relative_to(Path::new(&root), Path::new(&raw)) {
            RelativePath::Inside(rel) => {
                let rel = rel.as_str();
                prop_assert!(!rel.is_empty());
                prop_assert!(!rel.starts_with('/'));
                if windows {
                    prop_assert!(!rel.contains('\\'));
                }
                prop_assert!(!rel.split('/').any(|s| s == ".." || s == "." || s.is_empty()));
            }
            RelativePath::Root | RelativePath::Outside | RelativePath::OtherVolume => {}
        }
    }

    #[test]
    fn children_of_root_are_inside(
        root in prop::collection::vec("[a-z]{1,6}", 1..4),
        child in prop::collection::vec("[a-z]{1,6}", 1..4),
    ) {
        let n = PathNormalizer::posix();
        let root = format!("/{}", root.join("/"));
        let path = format!("{root}/{}", child.join("/"));
        let rel = n.relative_to(Path::new(&root), Path::new(&path)).inside();
        prop_assert_eq!(rel.map(|r| r.into_string()), Some(child.join("/")));
    }
}
