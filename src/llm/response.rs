//! Response envelope of the `generateContent` endpoint.

use serde::Deserialize;
use tracing::debug;

use crate::error::GenerateError;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract the first candidate's first text part from a success body.
///
/// Returns the text untrimmed. A missing field, a blank text, or a body that
/// is not the expected JSON is [`GenerateError::EmptyGeneration`].
pub fn extract_generated_text(body: &str) -> Result<String, GenerateError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        debug!("Failed to decode generation response: {}", e);
        GenerateError::EmptyGeneration
    })?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or(GenerateError::EmptyGeneration)?;

    if text.trim().is_empty() {
        return Err(GenerateError::EmptyGeneration);
    }

    Ok(text)
}

/// Best-effort human message from an error body.
///
/// Falls back to the first 200 characters of the raw body.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(200).collect()
}
