//! Object-name sanitization and path confinement.
//!
//! A logical object name (`User/Admin`) maps to one file under the store
//! root (`<root>/User/Admin.data`). [`sanitize`] turns an arbitrary name
//! into a safe relative path; [`validate`] is the sole defense against
//! traversal and must run before any filesystem access keyed by a
//! user-supplied name.

use std::path::{Path, PathBuf};

/// File extension for record files.
pub const RECORD_EXT: &str = "data";

/// Sanitize a logical object name into a safe relative path.
///
/// Backslashes are normalized to `/`, characters outside
/// `[A-Za-z0-9/_\-.]` are stripped, the substring `..` is removed
/// repeatedly until none remains (a single pass would let stripped
/// characters re-form `..`), repeated separators are collapsed, and
/// leading/trailing separators are trimmed. The result may be empty.
pub fn sanitize(name: &str) -> String {
    let normalized = name.replace('\\', "/");
    let mut cleaned: String = normalized
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '.'))
        .collect();

    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }

    cleaned
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// The on-disk path for a sanitized object name.
pub fn record_path(root: &Path, sanitized: &str) -> PathBuf {
    root.join(format!("{sanitized}.{RECORD_EXT}"))
}

/// Check that `path` resolves inside `root`.
///
/// Both the root and the path's containing directory are canonicalized;
/// the canonical directory must be prefixed by the canonical root. When
/// the containing directory does not exist yet (intermediate directories
/// are created lazily on save), the root itself stands in for it. Any
/// resolution failure answers `false`.
pub fn validate(root: &Path, path: &Path) -> bool {
    let Ok(canonical_root) = root.canonicalize() else {
        return false;
    };

    let dir = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => root,
        Some(parent) => parent,
        None => root,
    };

    let canonical_dir = if dir.exists() {
        match dir.canonicalize() {
            Ok(d) => d,
            Err(_) => return false,
        }
    } else {
        canonical_root.clone()
    };

    canonical_dir.starts_with(&canonical_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize("User"), "User");
        assert_eq!(sanitize("User/Admin"), "User/Admin");
        assert_eq!(sanitize("a_b-c.d"), "a_b-c.d");
    }

    #[test]
    fn backslashes_become_separators() {
        assert_eq!(sanitize(r"User\Admin"), "User/Admin");
    }

    #[test]
    fn disallowed_characters_are_stripped() {
        assert_eq!(sanitize("us er!@#"), "user");
        assert_eq!(sanitize("naïve"), "nave");
    }

    #[test]
    fn separators_collapse_and_trim() {
        assert_eq!(sanitize("//a///b//"), "a/b");
        assert_eq!(sanitize("/leading"), "leading");
        assert_eq!(sanitize("trailing/"), "trailing");
    }

    #[test]
    fn traversal_is_removed() {
        assert_eq!(sanitize("../../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize("a/../b"), "a/b");
    }

    #[test]
    fn traversal_removal_reaches_a_fixed_point() {
        // Stripping the '!' from ".!." re-forms ".." — one removal pass
        // would leave it behind.
        assert_eq!(sanitize(".!."), "");
        assert_eq!(sanitize("a/.!./b"), "a/b");
        assert_eq!(sanitize("..!.."), "");
    }

    #[test]
    fn empty_and_degenerate_names() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("///"), "");
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn record_path_appends_extension() {
        let p = record_path(Path::new("/data"), "User/Admin");
        assert_eq!(p, PathBuf::from("/data/User/Admin.data"));
    }

    #[test]
    fn record_path_keeps_dotted_names() {
        let p = record_path(Path::new("/data"), "file.v2");
        assert_eq!(p, PathBuf::from("/data/file.v2.data"));
    }

    #[test]
    fn validate_accepts_paths_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("User.data");
        assert!(validate(dir.path(), &path));
    }

    #[test]
    fn validate_accepts_missing_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not/yet/created/User.data");
        assert!(validate(dir.path(), &path));
    }

    #[test]
    fn validate_rejects_paths_outside_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        std::fs::create_dir(&root).unwrap();
        let escape = outer.path().join("elsewhere.data");
        assert!(!validate(&root, &escape));
    }

    #[test]
    fn validate_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("never-created");
        assert!(!validate(&root, &root.join("User.data")));
    }

    #[cfg(unix)]
    #[test]
    fn validate_rejects_symlink_escape() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        let target = outer.path().join("target");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&target).unwrap();
        std::os::unix::fs::symlink(&target, root.join("link")).unwrap();

        // <root>/link/x.data resolves into <outer>/target, outside root.
        assert!(!validate(&root, &root.join("link/x.data")));
    }
}
