//! Gemini-backed translation.
//!
//! Calls the generateContent endpoint with a translation system prompt.
//! Transient failures are retried with exponential backoff. Model and
//! temperature are process-wide mutable state driven by the admin
//! commands.

use std::sync::RwLock;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use lingobot_core::{language_name, BotError, Translator};

use crate::schemas::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

/// Model ids accepted by `/setmodel`.
pub const VALID_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
];

pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const SYSTEM_PROMPT: &str = "You are a professional real-time translation assistant. \
Translate the given text from the source language to the target language with complete \
accuracy, preserving meaning, tone, idioms, formatting, and named entities. Do not soften, \
censor, summarize, or editorialize. Output only the translated text with no commentary.";

struct ModelState {
    model: String,
    temperature: f64,
}

pub struct GeminiTranslator {
    client: reqwest::Client,
    api_key: String,
    state: RwLock<ModelState>,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl GeminiTranslator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f64) -> Result<Self> {
        let model = model.into();
        if !VALID_MODELS.contains(&model.as_str()) {
            bail!("unknown translation model: {model}");
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
            bail!("temperature {temperature} outside [{MIN_TEMPERATURE}, {MAX_TEMPERATURE}]");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            state: RwLock::new(ModelState { model, temperature }),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
        })
    }

    async fn execute_translation(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let (model, temperature) = {
            let state = self.state.read().expect("model state poisoned");
            (state.model.clone(), state.temperature)
        };

        let prompt = format!(
            "Translate the following text from {} to {}:\n\n{text}",
            language_name(source),
            language_name(target),
        );
        let request = GenerateContentRequest {
            system_instruction: Some(Content::system(SYSTEM_PROMPT)),
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature,
                response_modalities: None,
            }),
        };

        let url = format!("{API_BASE}/{model}:generateContent?key={}", self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("sending translation request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("translation API returned status {status}");
        }

        let body: GenerateContentResponse =
            response.json().await.context("decoding translation response")?;
        let translated = body.joined_text();
        if translated.trim().is_empty() {
            bail!("translation API returned no text");
        }
        Ok(translated.trim().to_string())
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let mut backoff = self.initial_backoff;
        let mut last_err = None;

        for attempt in 1..=self.max_retries {
            match self.execute_translation(text, source, target).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(attempt, "translation succeeded after retry");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "translation attempt failed");
                    last_err = Some(err);
                }
            }
            if attempt < self.max_retries {
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.max_backoff);
            }
        }

        let detail = match last_err {
            Some(err) => format!("after {} attempts: {err:#}", self.max_retries),
            None => "no attempts were made".to_string(),
        };
        Err(BotError::Capability(format!("translation failed {detail}")).into())
    }

    fn set_model(&self, model_id: &str) -> Result<()> {
        if !VALID_MODELS.contains(&model_id) {
            bail!(
                "unknown model {model_id}; supported: {}",
                VALID_MODELS.join(", ")
            );
        }
        self.state.write().expect("model state poisoned").model = model_id.to_string();
        Ok(())
    }

    fn model(&self) -> String {
        self.state.read().expect("model state poisoned").model.clone()
    }

    fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
            bail!("temperature must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}");
        }
        self.state.write().expect("model state poisoned").temperature = temperature;
        Ok(())
    }

    fn temperature(&self) -> f64 {
        self.state.read().expect("model state poisoned").temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> GeminiTranslator {
        GeminiTranslator::new("test-key", "gemini-2.0-flash", DEFAULT_TEMPERATURE).unwrap()
    }

    #[test]
    fn rejects_unknown_model_at_construction() {
        assert!(GeminiTranslator::new("k", "gpt-4", 0.2).is_err());
    }

    #[test]
    fn set_model_validates_against_the_table() {
        let t = translator();
        assert!(t.set_model("gemini-2.5-flash").is_ok());
        assert_eq!(t.model(), "gemini-2.5-flash");
        assert!(t.set_model("not-a-model").is_err());
        assert_eq!(t.model(), "gemini-2.5-flash");
    }

    #[test]
    fn set_temperature_enforces_range() {
        let t = translator();
        assert!(t.set_temperature(0.7).is_ok());
        assert_eq!(t.temperature(), 0.7);
        assert!(t.set_temperature(1.5).is_err());
        assert!(t.set_temperature(-0.1).is_err());
        assert_eq!(t.temperature(), 0.7);
    }
}
