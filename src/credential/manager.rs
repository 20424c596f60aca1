//! Credential lifecycle: create on first use, reuse, replace on rejection.

use tracing::{debug, info};

use crate::error::CredentialError;

use super::key::ApiKey;
use super::prompt::{KeyPrompt, KeyRequest};
use super::store::SecretStore;

/// Slot holding the active API key.
pub const ACTIVE_KEY_SLOT: &str = "active-api-key";

/// Reads and writes the active API key, prompting when needed.
pub struct CredentialManager<S, P> {
    store: S,
    prompt: P,
}

impl<S: SecretStore, P: KeyPrompt> CredentialManager<S, P> {
    pub fn new(store: S, prompt: P) -> Self {
        Self { store, prompt }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Return the stored key, prompting for one if none is stored.
    ///
    /// `Ok(None)` means the user declined; the caller should abort without
    /// reporting an error.
    pub async fn get_credential(&self) -> Result<Option<ApiKey>, CredentialError> {
        if let Some(stored) = self.store.get(ACTIVE_KEY_SLOT).await? {
            if let Some(key) = ApiKey::new(stored) {
                debug!("Using stored API key");
                return Ok(Some(key));
            }
        }

        self.prompt_and_store(KeyRequest::FirstUse).await
    }

    /// Prompt for a new key unconditionally and store it if non-empty.
    pub async fn replace_credential(&self) -> Result<Option<ApiKey>, CredentialError> {
        self.prompt_and_store(KeyRequest::Replacement).await
    }

    /// Ask the user whether they want to replace a rate-limited key.
    pub fn confirm_replacement(&self) -> Result<bool, CredentialError> {
        self.prompt.confirm_replacement()
    }

    /// Remove the stored key. Returns whether one was stored.
    pub async fn forget_credential(&self) -> Result<bool, CredentialError> {
        self.store.delete(ACTIVE_KEY_SLOT).await
    }

    /// Whether a usable key is stored. Never prompts.
    pub async fn has_credential(&self) -> Result<bool, CredentialError> {
        Ok(self
            .store
            .get(ACTIVE_KEY_SLOT)
            .await?
            .and_then(ApiKey::new)
            .is_some())
    }

    async fn prompt_and_store(
        &self,
        reason: KeyRequest,
    ) -> Result<Option<ApiKey>, CredentialError> {
        let Some(key) = self.prompt.request_key(reason)?.and_then(ApiKey::new) else {
            info!("No API key entered");
            return Ok(None);
        };

        self.store.set(ACTIVE_KEY_SLOT, key.expose()).await?;
        debug!("Saved API key ({:?})", reason);
        Ok(Some(key))
    }
}
