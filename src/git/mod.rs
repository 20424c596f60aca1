//! Repository discovery and staged diff collection.

pub mod diff;
pub mod repo;

pub use diff::{DiffSource, GitDiffSource, MAX_DIFF_BYTES, StagedDiff, get_staged_diff};
pub use repo::resolve_repository_root;
