//! Message generation with a single credential-replacement retry on rate limiting.

use tracing::{debug, info};

use crate::credential::{ApiKey, CredentialManager, KeyPrompt, SecretStore};
use crate::error::GenerateError;
use crate::git::StagedDiff;
use crate::llm::TextGenerator;

use super::message::GeneratedMessage;
use super::prompt::build_commit_prompt;

/// Position in the retry loop. Only `Initial` may move to `Replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Replacement,
}

/// Turns a staged diff into a commit message via a [`TextGenerator`].
pub struct MessageGenerator<'a, G, S, P> {
    client: &'a G,
    credentials: &'a CredentialManager<S, P>,
}

impl<'a, G, S, P> MessageGenerator<'a, G, S, P>
where
    G: TextGenerator,
    S: SecretStore,
    P: KeyPrompt,
{
    pub fn new(client: &'a G, credentials: &'a CredentialManager<S, P>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Generate a message for `diff` using `credential`.
    ///
    /// On the first rate limit the user may supply a replacement key, which
    /// is stored and used for exactly one more call:
    /// - user declines the replacement: [`GenerateError::RateLimited`]
    /// - user cancels the key prompt: [`GenerateError::NoCredential`]
    /// - the replacement is rate limited too: [`GenerateError::RateLimited`]
    ///
    /// Every other failure is returned as-is without retrying.
    pub async fn generate(
        &self,
        credential: ApiKey,
        diff: &StagedDiff,
    ) -> Result<GeneratedMessage, GenerateError> {
        let prompt = build_commit_prompt(diff);
        debug!("Commit prompt length: {} chars", prompt.len());

        let mut key = credential;
        let mut attempt = Attempt::Initial;

        loop {
            match self.client.generate_text(&key, &prompt).await {
                Ok(raw) => return GeneratedMessage::from_raw(&raw),
                Err(GenerateError::RateLimited) if attempt == Attempt::Initial => {
                    if !self.credentials.confirm_replacement()? {
                        return Err(GenerateError::RateLimited);
                    }

                    let Some(replacement) = self.credentials.replace_credential().await? else {
                        return Err(GenerateError::NoCredential);
                    };

                    info!("Retrying once with the replacement API key");
                    key = replacement;
                    attempt = Attempt::Replacement;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
