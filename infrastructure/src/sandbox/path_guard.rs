//! Path confinement against a [`WorkingRoot`].
//!
//! Resolution steps:
//!
//! 1. Join the requested path onto the root (an absolute request replaces the root).
//! 2. Normalize `.` and `..` lexically.
//! 3. Canonicalize the deepest existing ancestor and re-append the rest, so
//!    symlinks that exist are followed and paths that do not exist yet
//!    (files about to be written) still resolve.
//! 4. Accept only if the result is the root or a descendant of it,
//!    compared component by component.
//!
//! A symlink inside the root pointing outside it is rejected, as is a
//! dangling symlink, since writing through it could create a file anywhere.

use confine_domain::{SandboxViolation, WorkingRoot, normalize_lexically};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct PathGuard;

impl PathGuard {
    /// Resolve `requested` (normally relative) against `root`.
    ///
    /// No file is opened or created; on rejection the caller must not touch
    /// the filesystem.
    pub fn resolve(root: &WorkingRoot, requested: &str) -> Result<PathBuf, SandboxViolation> {
        let joined = root.path().join(requested);
        let normalized = normalize_lexically(&joined);

        let Some(resolved) = canonicalize_best_effort(&normalized) else {
            debug!(requested, "Rejected path through dangling symlink");
            return Err(SandboxViolation::new(requested, normalized));
        };

        if root.contains(&resolved) {
            Ok(resolved)
        } else {
            debug!(requested, resolved = %resolved.display(), "Rejected path outside working root");
            Err(SandboxViolation::new(requested, resolved))
        }
    }
}

/// Canonicalize the deepest existing ancestor of an already-normalized
/// absolute path and append the non-existent tail. Returns `None` when an
/// existing entry cannot be canonicalized (a dangling symlink).
fn canonicalize_best_effort(path: &Path) -> Option<PathBuf> {
    let mut existing = path;
    let mut tail = Vec::new();

    loop {
        if std::fs::symlink_metadata(existing).is_ok() {
            let mut resolved = existing.canonicalize().ok()?;
            for part in tail.iter().rev() {
                resolved.push(part);
            }
            return Some(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return Some(path.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confine_domain::ErrorCategory;
    use confine_domain::ToolError;

    fn root() -> (tempfile::TempDir, WorkingRoot) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("work/sub")).unwrap();
        let root = WorkingRoot::open(dir.path().join("work")).unwrap();
        (dir, root)
    }

    #[test]
    fn test_relative_path_inside_is_accepted() {
        let (_dir, root) = root();
        let resolved = PathGuard::resolve(&root, "sub/file.txt").unwrap();
        assert_eq!(resolved, root.path().join("sub/file.txt"));
    }

    #[test]
    fn test_parent_escape_is_rejected() {
        let (_dir, root) = root();
        let err = PathGuard::resolve(&root, "../../etc/passwd").unwrap_err();
        assert_eq!(err.requested, "../../etc/passwd");

        let tool_err: ToolError = err.into();
        assert!(tool_err.is(ErrorCategory::SandboxViolation));
    }

    #[test]
    fn test_root_itself_is_accepted() {
        let (_dir, root) = root();
        assert_eq!(PathGuard::resolve(&root, ".").unwrap(), root.path());
        assert_eq!(PathGuard::resolve(&root, "sub/..").unwrap(), root.path());
    }

    #[test]
    fn test_dotdot_that_stays_inside_is_accepted() {
        let (_dir, root) = root();
        let resolved = PathGuard::resolve(&root, "sub/../other.txt").unwrap();
        assert_eq!(resolved, root.path().join("other.txt"));
    }

    #[test]
    fn test_absolute_paths() {
        let (_dir, root) = root();
        assert!(PathGuard::resolve(&root, "/etc/passwd").is_err());

        let inside = root.path().join("sub");
        assert_eq!(
            PathGuard::resolve(&root, inside.to_str().unwrap()).unwrap(),
            inside
        );
    }

    #[test]
    fn test_sibling_with_common_prefix_is_rejected() {
        let (dir, root) = root();
        std::fs::create_dir_all(dir.path().join("work2")).unwrap();
        assert!(PathGuard::resolve(&root, "../work2/x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_root_is_rejected() {
        let (dir, root) = root();
        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("secret.txt"), "s").unwrap();
        std::os::unix::fs::symlink(&outside, root.path().join("link")).unwrap();

        assert!(PathGuard::resolve(&root, "link/secret.txt").is_err());
        assert!(PathGuard::resolve(&root, "link/new.txt").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_within_root_is_accepted() {
        let (_dir, root) = root();
        std::os::unix::fs::symlink(root.path().join("sub"), root.path().join("alias")).unwrap();

        let resolved = PathGuard::resolve(&root, "alias/f.txt").unwrap();
        assert_eq!(resolved, root.path().join("sub/f.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_rejected() {
        let (dir, root) = root();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), root.path().join("dangling")).unwrap();

        assert!(PathGuard::resolve(&root, "dangling").is_err());
    }
}
