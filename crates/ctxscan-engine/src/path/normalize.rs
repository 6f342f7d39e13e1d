//! Path canonicalization for comparison.
//!
//! Every path the engine compares or feeds to the ignore matcher goes through
//! [`PathNormalizer`] first. Normalized paths use `/` as the only separator
//! and have `.`/`..` segments resolved lexically. Under Windows rules `\` is
//! a separator too, and a volume prefix (`c:` or `//server/share`) is split
//! off and lower-cased when the normalizer is case-insensitive. Under POSIX
//! rules `\` is an ordinary filename character and is left alone.

use std::path::Path;

/// A path relative to a scan root.
///
/// Only [`PathNormalizer::relative_to`] constructs values of this type, so
/// holding one proves the path is neither absolute nor escapes the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath(String);

impl RelPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Number of components; `a/b/c` has depth 3.
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of relating a path to a scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelativePath {
    /// The path is the root itself.
    Root,
    Inside(RelPath),
    /// Same volume, but not under the root.
    Outside,
    /// Different drive letter or network share.
    OtherVolume,
}

impl RelativePath {
    pub fn inside(self) -> Option<RelPath> {
        match self {
            RelativePath::Inside(rel) => Some(rel),
            _ => None,
        }
    }
}

/// Canonicalizes platform path strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNormalizer {
    windows: bool,
    case_insensitive: bool,
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::native()
    }
}

impl PathNormalizer {
    /// Rules of the host platform.
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::windows()
        } else {
            Self::posix()
        }
    }

    /// `/` is the only separator, no volume prefixes, case-sensitive.
    pub fn posix() -> Self {
        Self {
            windows: false,
            case_insensitive: false,
        }
    }

    /// `\` is a separator as well as `/`, and drive and UNC prefixes are volumes.
    /// Comparison ignores case.
    pub fn windows() -> Self {
        Self {
            windows: true,
            case_insensitive: true,
        }
    }

    /// Override case sensitivity, e.g. for a case-insensitive POSIX volume.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn is_windows(&self) -> bool {
        self.windows
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn normalize(&self, path: &Path) -> String {
        self.normalize_str(&path.to_string_lossy())
    }

    pub fn normalize_str(&self, raw: &str) -> String {
        let unified = if self.windows {
            strip_verbatim(raw.replace('\\', "/"))
        } else {
            raw.to_string()
        };
        let (prefix, rest) = self.split_volume(&unified);
        let prefix = if self.case_insensitive {
            prefix.to_lowercase()
        } else {
            prefix.to_string()
        };

        let absolute = rest.starts_with('/') || prefix.starts_with("//");
        let mut parts: Vec<&str> = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    }
                    // `..` above an absolute root stays at the root.
                    _ if absolute => {}
                    _ => parts.push(".."),
                },
                other => parts.push(other),
            }
        }

        let body = parts.join("/");
        match (prefix.is_empty(), absolute) {
            (true, true) => format!("/{body}"),
            (true, false) if body.is_empty() => ".".to_string(),
            (true, false) => body,
            (false, _) if prefix.starts_with("//") => {
                if body.is_empty() {
                    prefix
                } else {
                    format!("{prefix}/{body}")
                }
            }
            (false, true) => format!("{prefix}/{body}"),
            (false, false) => format!("{prefix}{body}"),
        }
    }

    /// Relate `path` to `root`.
    ///
    /// Never fails: paths on another volume or outside the root are reported
    /// as such so callers can skip them instead of handing an absolute path to
    /// a matcher that only accepts relative ones. A non-absolute `path` is
    /// interpreted relative to `root`.
    pub fn relative_to(&self, root: &Path, path: &Path) -> RelativePath {
        let root = self.normalize(root);
        let raw = self.normalize(path);
        let path = if self.is_absolute_normalized(&raw) {
            raw
        } else {
            self.normalize_str(&format!("{root}/{raw}"))
        };

        let (root_volume, root_rest) = self.split_volume(&root);
        let (path_volume, path_rest) = self.split_volume(&path);
        if !self.eq(root_volume, path_volume) {
            return RelativePath::OtherVolume;
        }

        let root_rest = root_rest.trim_end_matches('/');
        if self.eq(root_rest, path_rest.trim_end_matches('/')) {
            return RelativePath::Root;
        }

        let candidate = if root_rest.is_empty() {
            // Root is the volume root itself (`/`, `c:/`, `//server/share`).
            Some(path_rest.trim_start_matches('/'))
        } else {
            path_rest
                .get(..root_rest.len())
                .filter(|head| self.eq(head, root_rest))
                .and_then(|_| path_rest[root_rest.len()..].strip_prefix('/'))
        };

        match candidate {
            Some(rel) if !rel.is_empty() && rel != ".." && !rel.starts_with("../") => {
                RelativePath::Inside(RelPath(rel.to_string()))
            }
            _ => RelativePath::Outside,
        }
    }

    fn eq(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }

    /// Split a normalized path into its volume prefix and remainder. POSIX
    /// paths have no volume prefix.
    fn split_volume<'p>(&self, path: &'p str) -> (&'p str, &'p str) {
        if !self.windows {
            return ("", path);
        }
        if let Some(after) = path.strip_prefix("//") {
            if !after.starts_with('/') {
                let mut end = 2;
                for (i, component) in after.splitn(3, '/').take(2).enumerate() {
                    end += component.len() + usize::from(i > 0);
                }
                let end = end.min(path.len());
                return (&path[..end], &path[end..]);
            }
        }
        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
            return (&path[..2], &path[2..]);
        }
        ("", path)
    }

    fn is_absolute_normalized(&self, path: &str) -> bool {
        let (volume, rest) = self.split_volume(path);
        volume.starts_with("//") || rest.starts_with('/')
    }
}

fn strip_verbatim(path: String) -> String {
    if let Some(rest) = path.strip_prefix("//?/UNC/") {
        return format!("//{rest}");
    }
    match path.strip_prefix("//?/") {
        Some(rest) => rest.to_string(),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posix() -> PathNormalizer {
        PathNormalizer::posix()
    }

    fn windows() -> PathNormalizer {
        PathNormalizer::windows()
    }

    #[test]
    fn unifies_separators_and_resolves_dots() {
        let n = posix();
        assert_eq!(n.normalize_str("/proj//src/./lib/../main.rs"), "/proj/src/main.rs");
        assert_eq!(windows().normalize_str("a\\b\\c"), "a/b/c");
        assert_eq!(n.normalize_str("/proj/"), "/proj");
        assert_eq!(n.normalize_str("/"), "/");
        assert_eq!(n.normalize_str("/.."), "/");
        assert_eq!(n.normalize_str("../x"), "../x");
        assert_eq!(n.normalize_str(""), ".");
    }

    #[test]
    fn lowercases_drive_prefix_only_when_case_insensitive() {
        assert_eq!(windows().normalize_str("C:\\Users\\Me"), "c:/Users/Me");
        assert_eq!(
            windows().with_case_insensitive(false).normalize_str("C:\\Users\\Me"),
            "C:/Users/Me"
        );
    }

    #[test]
    fn posix_keeps_backslashes_and_colons_in_names() {
        let n = posix();
        assert_eq!(n.normalize_str("/proj/x\\y"), "/proj/x\\y");
        assert_eq!(n.normalize_str("C:\\Users"), "C:\\Users");
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("/proj/x\\y")),
            RelativePath::Inside(RelPath("x\\y".into()))
        );
        assert_ne!(
            n.relative_to(Path::new("/proj"), Path::new("/proj/x\\y")),
            n.relative_to(Path::new("/proj"), Path::new("/proj/x/y"))
        );
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("c:/a")),
            RelativePath::Inside(RelPath("c:/a".into()))
        );
    }

    #[test]
    fn handles_unc_and_verbatim_prefixes() {
        let n = windows();
        assert_eq!(n.normalize_str("\\\\Server\\Share\\dir\\f.txt"), "//server/share/dir/f.txt");
        assert_eq!(n.normalize_str("\\\\?\\C:\\work"), "c:/work");
        assert_eq!(n.normalize_str("\\\\?\\UNC\\Server\\Share\\x"), "//server/share/x");
        assert_eq!(n.normalize_str("\\\\server\\share"), "//server/share");
    }

    #[test]
    fn relative_inside_root() {
        let n = posix();
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("/proj/src/main.rs")),
            RelativePath::Inside(RelPath("src/main.rs".into()))
        );
        assert_eq!(
            n.relative_to(Path::new("/proj/"), Path::new("/proj")),
            RelativePath::Root
        );
    }

    #[test]
    fn sibling_with_shared_prefix_is_outside() {
        let n = posix();
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("/project/a.txt")),
            RelativePath::Outside
        );
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("/proj/../etc/passwd")),
            RelativePath::Outside
        );
    }

    #[test]
    fn relative_input_is_resolved_against_root() {
        let n = posix();
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("src/a.rs")),
            RelativePath::Inside(RelPath("src/a.rs".into()))
        );
        assert_eq!(
            n.relative_to(Path::new("/proj"), Path::new("../other/a.rs")),
            RelativePath::Outside
        );
    }

    #[test]
    fn cross_drive_is_other_volume_not_a_panic() {
        let n = windows();
        assert_eq!(
            n.relative_to(Path::new("C:\\proj"), Path::new("D:\\proj\\a.txt")),
            RelativePath::OtherVolume
        );
        assert_eq!(
            n.relative_to(Path::new("C:\\proj"), Path::new("\\\\srv\\share\\a.txt")),
            RelativePath::OtherVolume
        );
    }

    #[test]
    fn case_insensitive_root_match() {
        let n = windows();
        assert_eq!(
            n.relative_to(Path::new("C:\\Proj"), Path::new("c:\\proj\\Src\\A.rs")),
            RelativePath::Inside(RelPath("Src/A.rs".into()))
        );
        assert_eq!(
            posix().relative_to(Path::new("/Proj"), Path::new("/proj/a")),
            RelativePath::Outside
        );
    }

    #[test]
    fn volume_root_as_scan_root() {
        let n = posix();
        assert_eq!(
            n.relative_to(Path::new("/"), Path::new("/etc/hosts")),
            RelativePath::Inside(RelPath("etc/hosts".into()))
        );
    }

    #[test]
    fn rel_path_depth() {
        assert_eq!(RelPath("a".into()).depth(), 1);
        assert_eq!(RelPath("a/b/c".into()).depth(), 3);
    }
}
