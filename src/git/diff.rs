//! Staged diff collection by shelling out to `git diff --cached`.
//!
//! The system `git` binary is used so the user's diff configuration
//! (rename detection, attributes) applies unchanged.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::DiffError;

/// Upper bound on captured diff output (16 MiB).
///
/// Larger diffs fail instead of being silently truncated.
pub const MAX_DIFF_BYTES: usize = 16 * 1024 * 1024;

/// The staged changes of a repository, as unified diff text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDiff {
    text: String,
}

impl StagedDiff {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whitespace-only diffs mean nothing is staged.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Source of staged diffs.
///
/// This abstraction allows substituting canned diffs in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn staged_diff(&self, repo_root: &Path) -> Result<StagedDiff, DiffError>;
}

/// Diff source backed by the system `git` binary.
#[derive(Debug, Clone)]
pub struct GitDiffSource {
    max_bytes: usize,
}

impl GitDiffSource {
    pub fn new() -> Self {
        Self {
            max_bytes: MAX_DIFF_BYTES,
        }
    }

    /// Use a custom capture bound.
    pub fn with_limit(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl Default for GitDiffSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiffSource for GitDiffSource {
    async fn staged_diff(&self, repo_root: &Path) -> Result<StagedDiff, DiffError> {
        collect_staged_diff(repo_root, self.max_bytes).await
    }
}

/// Run `git diff --cached` in `repo_root` with the default capture bound.
pub async fn get_staged_diff(repo_root: &Path) -> Result<StagedDiff, DiffError> {
    collect_staged_diff(repo_root, MAX_DIFF_BYTES).await
}

async fn collect_staged_diff(repo_root: &Path, max_bytes: usize) -> Result<StagedDiff, DiffError> {
    if which::which("git").is_err() {
        return Err(DiffError::GitNotInstalled);
    }

    let mut child = Command::new("git")
        .args(["diff", "--cached", "--no-color", "--no-ext-diff"])
        .current_dir(repo_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(DiffError::SpawnFailed)?;

    let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(DiffError::SpawnFailed(std::io::Error::other(
            "git output was not captured",
        )));
    };

    // Drain stderr on its own task so a chatty git cannot block on a full pipe.
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf).await;
        buf
    });

    let mut captured = Vec::new();
    stdout
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut captured)
        .await
        .map_err(DiffError::SpawnFailed)?;

    if captured.len() > max_bytes {
        let _ = child.kill().await;
        return Err(DiffError::OutputTooLarge { limit: max_bytes });
    }

    let status = child.wait().await.map_err(DiffError::SpawnFailed)?;
    let stderr = stderr_task.await.unwrap_or_default();

    if !status.success() {
        return Err(DiffError::NonZeroExit {
            code: status.code().unwrap_or(-1),
            stderr: first_line(&String::from_utf8_lossy(&stderr)),
        });
    }

    // Files in legacy encodings still produce a usable diff; bytes that are
    // not UTF-8 become U+FFFD.
    let text = String::from_utf8_lossy(&captured).into_owned();
    debug!(
        "Collected staged diff: {} bytes from {}",
        text.len(),
        repo_root.display()
    );

    Ok(StagedDiff::new(text))
}

/// First non-empty line of git's stderr; usage dumps follow the error line.
fn first_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
