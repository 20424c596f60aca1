//! API key storage and the prompts that fill it.

pub mod key;
pub mod manager;
pub mod prompt;
pub mod store;

pub use key::ApiKey;
pub use manager::{ACTIVE_KEY_SLOT, CredentialManager};
pub use prompt::{KeyPrompt, KeyRequest, TerminalPrompt};
pub use store::{FileSecretStore, MemorySecretStore, SecretStore};
