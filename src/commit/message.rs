//! The generated commit message.

use std::fmt;

use crate::error::GenerateError;

/// A trimmed, non-empty commit message proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMessage {
    text: String,
}

impl GeneratedMessage {
    /// Trim raw model output. Blank output is [`GenerateError::EmptyGeneration`].
    ///
    /// Nothing else is checked: length and format are left to the user's review.
    pub fn from_raw(raw: &str) -> Result<Self, GenerateError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(GenerateError::EmptyGeneration);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for GeneratedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
