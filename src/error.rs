//! Error types for commitscribe modules using thiserror.

use thiserror::Error;

/// Errors from the credential store and key prompts.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read credential store {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write credential store {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential store {path} is corrupt: {reason}")]
    Malformed { path: String, reason: String },

    #[error("No configuration directory available; set COMMITSCRIBE_CREDENTIALS")]
    NoConfigDir,

    #[error("Failed to read input from terminal: {0}")]
    PromptFailed(String),
}

/// Errors from locating the repository and collecting the staged diff.
///
/// Every variant except [`DiffError::NoWorkspace`] means the diff could not
/// be obtained.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("No git repository found. Run commitscribe inside a repository or pass --repo.")]
    NoWorkspace,

    #[error("git not found in PATH")]
    GitNotInstalled,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git diff --cached exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Staged diff is larger than {limit} bytes")]
    OutputTooLarge { limit: usize },
}

impl DiffError {
    /// Whether the repository was found but the diff could not be read.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, DiffError::NoWorkspace)
    }
}

/// Errors from the generation endpoint and the rate-limit retry loop.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Rate limited by the generation API. Try again later or use a different API key.")]
    RateLimited,

    #[error("Generation API returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Generation API returned no usable text")]
    EmptyGeneration,

    #[error("No API key provided")]
    NoCredential,

    #[error("Request to generation API failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl GenerateError {
    /// HTTP status for upstream failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerateError::RateLimited => Some(429),
            GenerateError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from delivering the message to its destination.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write commit message to {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write commit message to stdout: {0}")]
    Stdout(#[source] std::io::Error),

    #[error("Message review cancelled: {0}")]
    ReviewFailed(String),
}

/// Any failure of a full generation run.
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ScribeError {
    /// Whether the user declined to provide an API key.
    ///
    /// Covers both the first-use prompt and the replacement prompt after a
    /// rate limit.
    pub fn is_no_credential(&self) -> bool {
        matches!(self, ScribeError::Generate(GenerateError::NoCredential))
    }
}
