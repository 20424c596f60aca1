//! Repository root resolution.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::DiffError;

/// Resolve the working-tree root of the repository containing the first candidate.
///
/// Later candidates are ignored. Subdirectories resolve to their enclosing
/// repository's root.
///
/// Fails with [`DiffError::NoWorkspace`] when there are no candidates, the
/// first one is not inside a repository, or the repository is bare.
pub fn resolve_repository_root<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, DiffError> {
    let Some(first) = candidates.first() else {
        debug!("No repository candidates supplied");
        return Err(DiffError::NoWorkspace);
    };
    let first = first.as_ref();

    if candidates.len() > 1 {
        debug!(
            "{} repository candidates, using the first: {}",
            candidates.len(),
            first.display()
        );
    }

    let repo = Repository::discover(first).map_err(|e| {
        debug!("No repository at {}: {}", first.display(), e);
        DiffError::NoWorkspace
    })?;

    match repo.workdir() {
        Some(workdir) => Ok(workdir.to_path_buf()),
        None => {
            debug!("Repository at {} is bare", repo.path().display());
            Err(DiffError::NoWorkspace)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).expect("failed to canonicalize")
    }

    #[test]
    fn test_no_candidates_is_no_workspace() {
        let candidates: [&Path; 0] = [];
        let result = resolve_repository_root(&candidates);
        assert!(matches!(result, Err(DiffError::NoWorkspace)));
    }

    #[test]
    fn test_repo_root_resolves_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        let root = resolve_repository_root(&[dir.path()]).unwrap();
        assert_eq!(canonical(&root), canonical(dir.path()));
    }

    #[test]
    fn test_subdirectory_resolves_to_repo_root() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let root = resolve_repository_root(&[nested]).unwrap();
        assert_eq!(canonical(&root), canonical(dir.path()));
    }

    #[test]
    fn test_first_candidate_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        Repository::init(first.path()).unwrap();
        Repository::init(second.path()).unwrap();

        let root = resolve_repository_root(&[first.path(), second.path()]).unwrap();
        assert_eq!(canonical(&root), canonical(first.path()));
    }

    #[test]
    fn test_bare_repo_is_no_workspace() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init_bare(dir.path()).unwrap();

        let result = resolve_repository_root(&[dir.path()]);
        assert!(matches!(result, Err(DiffError::NoWorkspace)));
    }
}
