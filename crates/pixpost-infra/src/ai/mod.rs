//! Gemini description client.
//!
//! Calls the Gemini `generateContent` REST endpoint with a prompt and an
//! inline base64 image. One attempt per call; callers decide how to degrade
//! when generation fails.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

use pixpost_core::ports::{DescribeError, DescriptionGenerator};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for the Gemini description service.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Image-to-text client for the Gemini API.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl DescriptionGenerator for GeminiClient {
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<String, DescribeError> {
        // Uploads are stored as-is, so the payload is sent as PNG without
        // sniffing the real content type.
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": "image/png", "data": STANDARD.encode(image) } }
                ]
            }]
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        tracing::debug!(
            model = %self.config.model,
            image_bytes = image.len(),
            "requesting image description"
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DescribeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %detail, "description service returned an error");
            return Err(DescribeError::Request(format!(
                "description service returned {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| DescribeError::Request(e.to_string()))?;

        extract_text(&payload).ok_or(DescribeError::EmptyResponse)
    }
}

/// Pull the generated text out of a `generateContent` response.
fn extract_text(payload: &Value) -> Option<String> {
    let text = payload["candidates"][0]["content"]["parts"][0]["text"].as_str()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
