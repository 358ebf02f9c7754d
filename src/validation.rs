//! Repository path validation and slash-normalised relative paths.
//!
//! Every path that leaves this crate (graph nodes, snapshot keys, document
//! headings) is repository-relative and uses `/` separators regardless of
//! platform. The helpers here are the only place that conversion happens.

use camino::{Utf8Component, Utf8Path};
use std::path::{Component, Path, PathBuf};

/// Errors raised while validating the repository root.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Path does not exist on disk
    #[error("The repository path '{0}' does not exist or is not a directory.")]
    NotFound(String),

    /// Path exists but is a regular file (or something else)
    #[error("The repository path '{0}' does not exist or is not a directory.")]
    NotADirectory(String),
}

/// Validate that `path` is an existing directory.
///
/// Returns the path unchanged on success. The path is not canonicalized;
/// the tree document prints the basename as typed.
pub fn validate_repository(path: &Path) -> Result<PathBuf, RepositoryError> {
    let display = path.to_string_lossy().to_string();
    if !path.exists() {
        return Err(RepositoryError::NotFound(display));
    }
    if !path.is_dir() {
        return Err(RepositoryError::NotADirectory(display));
    }
    Ok(path.to_path_buf())
}

/// Express `path` relative to `root` with `/` separators.
///
/// Falls back to the full lossy path when `path` is not under `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

/// Lexically normalise a slash path: drop `.` segments and fold `..`.
///
/// Leading `..` segments that would climb above the start are kept, so
/// `../x` stays `../x`. An empty result becomes `"."`. No filesystem access.
///
/// # Examples
/// - `"src/./a/../b.ts"` -> `"src/b.ts"`
/// - `"./file2"` -> `"file2"`
/// - `"a/.."` -> `"."`
pub fn normalize_slash_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for component in Utf8Path::new(&unified).components() {
        match component {
            Utf8Component::CurDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(&"..") | None => {
                    if !absolute {
                        parts.push("..");
                    }
                }
                Some(_) => {
                    parts.pop();
                }
            },
            Utf8Component::Normal(part) => parts.push(part),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Parent directory of a slash path (`""` for top-level entries).
pub fn slash_parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Final segment of a slash path.
pub fn slash_basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Join a relative segment onto a slash directory without normalising.
pub fn slash_join(dir: &str, rel: &str) -> String {
    if dir.is_empty() || dir == "." {
        rel.to_string()
    } else {
        format!("{}/{}", dir, rel)
    }
}

/// Relative slash path of `inner` when it lives under `root`.
///
/// Both paths are canonicalized first; `None` when either cannot be
/// resolved or when `inner` is outside `root` (or is `root` itself).
pub fn path_within_root(inner: &Path, root: &Path) -> Option<String> {
    let inner = std::fs::canonicalize(inner).ok()?;
    let root = std::fs::canonicalize(root).ok()?;
    let rel = relative_slash_path(&root, &inner);
    if inner.starts_with(&root) && !rel.is_empty() {
        Some(rel)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_slash_path() {
        assert_eq!(normalize_slash_path("./file2"), "file2");
        assert_eq!(normalize_slash_path("src/./a/../b.ts"), "src/b.ts");
        assert_eq!(normalize_slash_path("a/.."), ".");
        assert_eq!(normalize_slash_path("../x"), "../x");
        assert_eq!(normalize_slash_path("a/../../x"), "../x");
        assert_eq!(normalize_slash_path("a//b"), "a/b");
        assert_eq!(normalize_slash_path("a\\b\\..\\c"), "a/c");
    }

    #[test]
    fn test_slash_helpers() {
        assert_eq!(slash_parent("src/lib/a.ts"), "src/lib");
        assert_eq!(slash_parent("a.ts"), "");
        assert_eq!(slash_basename("src/lib/a.ts"), "a.ts");
        assert_eq!(slash_basename("a.ts"), "a.ts");
        assert_eq!(slash_join("", "./m"), "./m");
        assert_eq!(slash_join("src", "./m"), "src/./m");
    }

    #[test]
    fn test_relative_slash_path() {
        let root = Path::new("/repo");
        assert_eq!(relative_slash_path(root, Path::new("/repo/src/a.py")), "src/a.py");
        assert_eq!(relative_slash_path(root, Path::new("/repo")), "");
    }

    #[test]
    fn test_validate_repository() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("file.txt"), "x").unwrap();

        assert!(validate_repository(root).is_ok());
        assert!(matches!(
            validate_repository(&root.join("missing")),
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            validate_repository(&root.join("file.txt")),
            Err(RepositoryError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_path_within_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("out/repindex")).unwrap();

        assert_eq!(
            path_within_root(&root.join("out/repindex"), root).as_deref(),
            Some("out/repindex")
        );
        assert_eq!(path_within_root(root, root), None);
    }
}
