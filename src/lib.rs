//! commitscribe - A CLI tool that proposes a Conventional Commit message for your staged changes.
//!
//! # Overview
//!
//! commitscribe reads `git diff --cached`, asks a remote text-generation model
//! for a single-line Conventional Commit message, and hands the result back
//! for review. The API key is stored locally and replaced interactively when
//! the endpoint rate limits it.

pub mod atomic;
pub mod commit;
pub mod config;
pub mod credential;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{GeneratedMessage, MessageSink, Outcome, Pipeline};
pub use config::Settings;
pub use credential::{ApiKey, CredentialManager, FileSecretStore, MemorySecretStore, SecretStore};
pub use error::{CredentialError, DiffError, GenerateError, ScribeError, SinkError};
pub use git::{DiffSource, GitDiffSource, StagedDiff, resolve_repository_root};
pub use llm::{GeminiClient, TextGenerator};
