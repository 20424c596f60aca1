//! The end-to-end run: credential, staged diff, generation, delivery.

use std::path::Path;

use tracing::{debug, info};

use crate::credential::{CredentialManager, KeyPrompt, SecretStore};
use crate::error::{GenerateError, ScribeError};
use crate::git::DiffSource;
use crate::llm::TextGenerator;

use super::generator::MessageGenerator;
use super::message::GeneratedMessage;
use super::sink::MessageSink;

/// Shown when the staged diff is blank.
pub const NO_STAGED_CHANGES_NOTICE: &str =
    "No staged changes found. Stage files with `git add` first.";

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A message was generated and handed to the sink.
    Delivered(GeneratedMessage),
    /// Nothing is staged; a warning was shown and no request was made.
    NoStagedChanges,
}

/// Everything a run needs besides the repository and the sink.
pub struct Pipeline<D, G, S, P> {
    diff_source: D,
    client: G,
    credentials: CredentialManager<S, P>,
}

impl<D, G, S, P> Pipeline<D, G, S, P>
where
    D: DiffSource,
    G: TextGenerator,
    S: SecretStore,
    P: KeyPrompt,
{
    pub fn new(diff_source: D, client: G, credentials: CredentialManager<S, P>) -> Self {
        Self {
            diff_source,
            client,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialManager<S, P> {
        &self.credentials
    }

    /// Generate a commit message for the staged changes in `repo_root`.
    ///
    /// The sink is written only when a message was generated. A declined key
    /// prompt, on first use or after a rate limit, is
    /// [`GenerateError::NoCredential`].
    pub async fn run(
        &self,
        repo_root: &Path,
        sink: &mut dyn MessageSink,
    ) -> Result<Outcome, ScribeError> {
        let Some(credential) = self.credentials.get_credential().await? else {
            return Err(GenerateError::NoCredential.into());
        };

        let diff = self.diff_source.staged_diff(repo_root).await?;
        if diff.is_blank() {
            debug!("Staged diff is blank; skipping generation");
            sink.warn(NO_STAGED_CHANGES_NOTICE);
            return Ok(Outcome::NoStagedChanges);
        }

        info!("Generating commit message for {} bytes of diff", diff.len());

        let message = MessageGenerator::new(&self.client, &self.credentials)
            .generate(credential, &diff)
            .await?;

        sink.deliver(&message)?;
        Ok(Outcome::Delivered(message))
    }
}
