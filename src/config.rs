//! Runtime settings resolved from environment variables.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::CredentialError;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Near-deterministic sampling.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// One short subject line needs very few tokens.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const API_BASE_ENV_VAR: &str = "COMMITSCRIBE_API_BASE";
const MODEL_ENV_VAR: &str = "COMMITSCRIBE_MODEL";
const TEMPERATURE_ENV_VAR: &str = "COMMITSCRIBE_TEMPERATURE";
const MAX_OUTPUT_TOKENS_ENV_VAR: &str = "COMMITSCRIBE_MAX_OUTPUT_TOKENS";
const TIMEOUT_ENV_VAR: &str = "COMMITSCRIBE_TIMEOUT";
const CREDENTIALS_ENV_VAR: &str = "COMMITSCRIBE_CREDENTIALS";

const APP_DIR: &str = "commitscribe";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Settings for the generation endpoint and credential storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
    /// Explicit credential file; `None` means the platform default.
    pub credentials_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials_path: None,
        }
    }
}

impl Settings {
    /// Read settings from `COMMITSCRIBE_*` environment variables.
    ///
    /// Unset or empty variables keep their defaults. Values that fail to
    /// parse are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Settings::default();

        Self {
            api_base: env_string(API_BASE_ENV_VAR)
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            model: env_string(MODEL_ENV_VAR).unwrap_or(defaults.model),
            temperature: env_parse(TEMPERATURE_ENV_VAR, defaults.temperature),
            max_output_tokens: env_parse(MAX_OUTPUT_TOKENS_ENV_VAR, defaults.max_output_tokens),
            timeout: Duration::from_secs(env_parse(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS)),
            credentials_path: env_string(CREDENTIALS_ENV_VAR).map(PathBuf::from),
        }
    }

    /// Path of the credential file, falling back to the platform config dir.
    pub fn credentials_path(&self) -> Result<PathBuf, CredentialError> {
        if let Some(path) = &self.credentials_path {
            return Ok(path.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CREDENTIALS_FILE))
            .ok_or(CredentialError::NoConfigDir)
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match env_string(name) {
        Some(v) => match v.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", name, v, default);
                default
            }
        },
        None => default,
    }
}
