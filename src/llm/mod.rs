//! Remote text-generation endpoint.

pub mod client;
pub mod response;

pub use client::{GeminiClient, TextGenerator};
pub use response::{extract_error_message, extract_generated_text};
