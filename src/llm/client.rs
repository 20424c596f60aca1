//! HTTP client for the `generateContent` text-generation endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::credential::ApiKey;
use crate::error::GenerateError;

use super::response::{extract_error_message, extract_generated_text};

/// A remote text-generation model.
///
/// This abstraction allows mocking the network call in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the generated text, untrimmed.
    async fn generate_text(&self, api_key: &ApiKey, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Client for a Gemini-style `models/{model}:generateContent` endpoint.
///
/// The key travels in the `key` query parameter.
pub struct GeminiClient {
    client: Client,
    api_base: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(settings: &Settings) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(GenerateError::Request)?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, api_key: &ApiKey, prompt: &str) -> Result<String, GenerateError> {
        debug!(
            "POST {} (model {}, prompt {} chars)",
            self.endpoint(),
            self.model,
            prompt.len()
        );

        // Strip the URL from transport errors: it carries the key.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.expose())])
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerateError::Request(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Request(e.without_url()))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Generation API rate limited the request");
            return Err(GenerateError::RateLimited);
        }

        if !status.is_success() {
            return Err(GenerateError::Upstream {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        extract_generated_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        let settings = Settings {
            api_base: "http://localhost:9999/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            temperature: 0.1,
            max_output_tokens: 42,
            ..Settings::default()
        };
        GeminiClient::new(&settings).unwrap()
    }

    #[test]
    fn test_endpoint_includes_model_and_method() {
        assert_eq!(
            client().endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = client();
        let body = serde_json::to_value(client.request_body("hello prompt")).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello prompt");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 42);
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }
}
