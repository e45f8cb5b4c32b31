//! Working-directory confinement for tool paths
//!
//! Paths supplied by the model are joined onto the sandbox root and
//! normalized lexically. When some prefix of the result already exists on
//! disk it is also canonicalized, so a symlink inside the root cannot be used
//! to reach outside it.

use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Result text returned to the model when a path escapes the sandbox
pub const PATH_TRAVERSAL_MESSAGE: &str = "Path traversal not allowed";

/// A directory tools may not leave
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a model-supplied path, or `None` if it leaves the root
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let candidate = normalize(&self.root.join(relative));
        if !candidate.starts_with(&self.root) || !self.within_real_root(&candidate) {
            warn!(path = relative, root = %self.root.display(), "Rejected path outside sandbox");
            return None;
        }
        Some(candidate)
    }

    fn within_real_root(&self, candidate: &Path) -> bool {
        // Nothing can escape through a root that does not exist yet.
        let Ok(real_root) = std::fs::canonicalize(&self.root) else {
            return true;
        };

        // symlink_metadata so a dangling link counts as existing and fails
        // canonicalization instead of being written through.
        let existing = candidate
            .ancestors()
            .find(|p| !p.as_os_str().is_empty() && p.symlink_metadata().is_ok());
        match existing {
            Some(path) => std::fs::canonicalize(path)
                .map(|real| real.starts_with(&real_root))
                .unwrap_or(false),
            None => true,
        }
    }
}

/// Resolve `.` and `..` without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
