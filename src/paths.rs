//! Path expansion, resolution, and the deletion allow-list.

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` or `~/` against the user's home directory.
///
/// Anything else (including `~user` forms) is returned unchanged.
pub fn expand_user(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Resolve a path to an absolute, symlink-free form even when the full path
/// does not exist yet.
///
/// The path is made absolute, dot segments are removed lexically, then the
/// nearest existing ancestor is canonicalized and the missing tail is
/// re-appended. A path that exists resolves exactly like
/// `std::fs::canonicalize`.
pub fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let absolute = normalize_lexically(&absolute);

    if let Ok(canon) = absolute.canonicalize() {
        return canon;
    }

    // Walk up to the nearest ancestor that exists, then re-attach the rest.
    let mut tail: Vec<std::ffi::OsString> = Vec::new();
    let mut cursor = absolute.clone();
    while let Some(parent) = cursor.parent() {
        match cursor.file_name() {
            Some(name) => tail.push(name.to_os_string()),
            None => break,
        }
        if let Ok(canon) = parent.canonicalize() {
            let mut resolved = canon;
            for part in tail.iter().rev() {
                resolved.push(part);
            }
            return resolved;
        }
        cursor = parent.to_path_buf();
    }
    absolute
}

/// Remove `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// The set of filesystem roots under which deletion may act.
///
/// A target qualifies only as a strict descendant of some member: a member
/// itself never qualifies, and an empty set permits nothing.
#[derive(Debug, Clone, Default)]
pub struct AllowedPathSet {
    roots: Vec<PathBuf>,
}

impl AllowedPathSet {
    /// Build from configured strings. Each member is tilde-expanded and
    /// resolved the same way targets are, so the comparison lines up.
    pub fn from_configured(raw: &[String]) -> Self {
        let roots = raw
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve(&expand_user(s)))
            .collect();
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `target` (already resolved) is a strict descendant of some
    /// member.
    pub fn permits(&self, target: &Path) -> bool {
        self.roots
            .iter()
            .any(|root| target.starts_with(root) && target != root)
    }
}

// ── tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_user("~"), home);
        assert_eq!(expand_user("~/notes.txt"), home.join("notes.txt"));
        assert_eq!(expand_user("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn resolve_follows_existing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(dir.path());
        assert_eq!(resolved, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn resolve_keeps_missing_tails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("not/yet/here.txt");
        let resolved = resolve(&target);
        assert_eq!(
            resolved,
            dir.path().canonicalize().unwrap().join("not/yet/here.txt")
        );
    }

    #[test]
    fn resolve_strips_dot_segments() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/./b/../c");
        let resolved = resolve(&target);
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("a/c"));
    }

    #[test]
    fn allow_list_requires_strict_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let set = AllowedPathSet::from_configured(&[root.display().to_string()]);

        assert!(set.permits(&root.join("child.txt")));
        assert!(set.permits(&root.join("deep/child.txt")));
        // The root itself is never deletable.
        assert!(!set.permits(&root));
        assert!(!set.permits(Path::new("/somewhere/else")));
    }

    #[test]
    fn sibling_prefix_does_not_qualify() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let set = AllowedPathSet::from_configured(&[root.join("data").display().to_string()]);

        // `data-backup` shares a string prefix with `data` but is a sibling.
        assert!(!set.permits(&root.join("data-backup/file.txt")));
        assert!(set.permits(&root.join("data/file.txt")));
    }

    #[test]
    fn empty_set_permits_nothing() {
        let set = AllowedPathSet::from_configured(&[]);
        assert!(set.is_empty());
        assert!(!set.permits(Path::new("/tmp/anything")));

        let blank = AllowedPathSet::from_configured(&["   ".to_string()]);
        assert!(blank.is_empty());
    }

    #[test]
    fn escape_via_dotdot_is_normalized_away() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let set = AllowedPathSet::from_configured(&[root.display().to_string()]);

        let sneaky = root.join("sub/../../etc/passwd");
        assert!(!set.permits(&resolve(&sneaky)));
    }
}
