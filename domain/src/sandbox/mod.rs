//! Sandbox trust boundary
//!
//! A [`WorkingRoot`] is the single directory subtree that every tool-driven
//! filesystem operation and process execution must stay inside. It is
//! created once per session and passed by reference into each tool call;
//! there is no process-wide root.
//!
//! Resolution of individual paths against the root lives in the
//! infrastructure `PathGuard`, which needs the filesystem to follow
//! symlinks. The lexical helpers here are pure.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Canonical absolute path of the sandbox directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkingRoot {
    path: PathBuf,
}

/// Errors opening a working root
#[derive(Error, Debug)]
pub enum RootError {
    #[error("Working directory {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Working directory {0} is not a directory")]
    NotADirectory(PathBuf),
}

impl WorkingRoot {
    /// Canonicalize `path` once. It must exist and be a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RootError> {
        let path = path.as_ref();
        let canonical = path.canonicalize().map_err(|source| RootError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(RootError::NotADirectory(canonical));
        }
        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `candidate` is the root or a descendant of it, compared
    /// component by component (`/work2` is not inside `/work`).
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.path)
    }

    /// Path of `absolute` relative to the root, for display
    pub fn relative<'a>(&self, absolute: &'a Path) -> &'a Path {
        absolute.strip_prefix(&self.path).unwrap_or(absolute)
    }
}

impl AsRef<Path> for WorkingRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for WorkingRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// A requested path resolved outside the working root.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot access \"{requested}\" as it is outside the permitted working directory")]
pub struct SandboxViolation {
    /// The path as the model supplied it
    pub requested: String,
    /// Where it actually resolved to
    pub resolved: PathBuf,
}

impl SandboxViolation {
    pub fn new(requested: impl Into<String>, resolved: PathBuf) -> Self {
        Self {
            requested: requested.into(),
            resolved,
        }
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component, without touching the filesystem. `..` at the root
/// stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/work/./sub/../file.txt")),
            PathBuf::from("/work/file.txt")
        );
        assert_eq!(
            normalize_lexically(Path::new("/work/../../etc/passwd")),
            PathBuf::from("/etc/passwd")
        );
        assert_eq!(normalize_lexically(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize_lexically(Path::new("../../c")), PathBuf::from("../../c"));
    }

    #[test]
    fn test_open_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(WorkingRoot::open(dir.path()).is_ok());
        assert!(matches!(WorkingRoot::open(&file), Err(RootError::NotADirectory(_))));
        assert!(matches!(
            WorkingRoot::open(dir.path().join("missing")),
            Err(RootError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_contains_is_component_wise() {
        let dir = tempfile::tempdir().unwrap();
        let root = WorkingRoot::open(dir.path()).unwrap();
        let base = root.path().to_path_buf();

        assert!(root.contains(&base));
        assert!(root.contains(&base.join("sub/file.txt")));

        let sibling = PathBuf::from(format!("{}2", base.display()));
        assert!(!root.contains(&sibling));
    }

    #[test]
    fn test_violation_message() {
        let v = SandboxViolation::new("../x", PathBuf::from("/x"));
        assert_eq!(
            v.to_string(),
            "Cannot access \"../x\" as it is outside the permitted working directory"
        );
    }
}
