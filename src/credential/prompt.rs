//! Interactive key prompts.

use dialoguer::{Confirm, Password};

use crate::error::CredentialError;

/// Why a key is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRequest {
    /// Nothing is stored yet.
    FirstUse,
    /// The stored key was rate limited.
    Replacement,
}

impl KeyRequest {
    fn prompt_text(&self) -> &'static str {
        match self {
            KeyRequest::FirstUse => "Enter your generation API key",
            KeyRequest::Replacement => "Enter a replacement API key",
        }
    }
}

/// User interaction needed by the credential lifecycle.
///
/// This abstraction allows scripting the prompts in tests.
#[cfg_attr(test, mockall::automock)]
pub trait KeyPrompt: Send + Sync {
    /// Ask for a key with masked input. `Ok(None)` if the user cancels or
    /// enters nothing.
    fn request_key(&self, reason: KeyRequest) -> Result<Option<String>, CredentialError>;

    /// Ask whether to supply a replacement key after a rate limit.
    fn confirm_replacement(&self) -> Result<bool, CredentialError>;
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompt;

impl KeyPrompt for TerminalPrompt {
    fn request_key(&self, reason: KeyRequest) -> Result<Option<String>, CredentialError> {
        let input = Password::new()
            .with_prompt(reason.prompt_text())
            .allow_empty_password(true)
            .interact();

        match input {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            // Closed stdin counts as cancellation
            Err(dialoguer::Error::IO(e)) if is_cancellation(e.kind()) => Ok(None),
            Err(e) => Err(CredentialError::PromptFailed(e.to_string())),
        }
    }

    fn confirm_replacement(&self) -> Result<bool, CredentialError> {
        Confirm::new()
            .with_prompt("The API key was rate limited. Enter a different key and retry?")
            .default(false)
            .interact()
            .map_err(|e| CredentialError::PromptFailed(e.to_string()))
    }
}

fn is_cancellation(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::Interrupted
    )
}
