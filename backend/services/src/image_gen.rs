//! Gemini-backed image generation.

use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use lingobot_core::ImageGenerator;

use crate::schemas::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiImageGenerator {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiImageGenerator {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, api_key: api_key.into() })
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>> {
        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: 1.0,
                response_modalities: Some(vec!["IMAGE".to_string(), "TEXT".to_string()]),
            }),
        };

        let url = format!("{API_BASE}/{IMAGE_MODEL}:generateContent?key={}", self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("sending image generation request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("image API returned status {status}");
        }

        let body: GenerateContentResponse =
            response.json().await.context("decoding image response")?;
        let Some(inline) = body.first_inline_data() else {
            bail!("image API returned no image data");
        };
        debug!(mime_type = %inline.mime_type, "decoding generated image");

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&inline.data)
            .context("decoding base64 image payload")?;
        if bytes.is_empty() {
            bail!("image API returned an empty payload");
        }
        Ok(bytes)
    }
}
