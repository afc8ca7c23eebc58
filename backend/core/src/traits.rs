//! Capability interfaces the core calls out through.
//!
//! Each trait is implemented by an external collaborator (the transport
//! client, the translation backend, ...). Handlers depend only on these
//! seams, which keeps the command framework testable with in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

use crate::event::{MediaKind, MediaRef};

/// Outbound message delivery through the transport.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Send a plain text message to a chat.
    async fn send_text(&self, chat: &str, text: &str) -> Result<()>;

    /// Send a text message quoting another message in the same chat.
    async fn send_reply(&self, chat: &str, text: &str, quoted_id: &str) -> Result<()>;

    /// Upload and send a media payload with a caption.
    async fn send_media(&self, chat: &str, kind: MediaKind, data: Vec<u8>, caption: &str)
        -> Result<()>;

    /// Replace the text of an already-sent message in place.
    async fn edit_text(&self, chat: &str, message_id: &str, new_text: &str) -> Result<()>;

    /// Replace the caption of an already-sent media message in place.
    /// `original` carries the transport handle needed to re-reference the
    /// media payload.
    async fn edit_media_caption(
        &self,
        chat: &str,
        message_id: &str,
        new_caption: &str,
        original: &MediaRef,
    ) -> Result<()>;
}

/// Text translation backend. Model and temperature selection are mutable
/// process-wide state consumed by the admin commands.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target` (two-letter codes).
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;

    fn set_model(&self, model_id: &str) -> Result<()>;
    fn model(&self) -> String;
    fn set_temperature(&self, temperature: f64) -> Result<()>;
    fn temperature(&self) -> f64;
}

/// Source-language detection backend.
pub trait LanguageDetector: Send + Sync {
    /// Detect the dominant language of `text`, returning its two-letter
    /// code, or `None` when detection is inconclusive.
    fn detect(&self, text: &str) -> Option<String>;
}

/// Prompt-driven image generation backend.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// One meme as returned by the meme backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Meme {
    pub title: String,
    pub url: String,
    pub subreddit: String,
}

/// Random meme fetch backend.
#[async_trait]
pub trait MemeFetcher: Send + Sync {
    /// Fetch a random meme, optionally restricted to one subreddit.
    async fn fetch_random(&self, subreddit: Option<&str>) -> Result<Meme>;

    /// Download the image payload behind a meme URL.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// URL media downloader. Returns the path of the downloaded file; the
/// caller owns size policy and cleanup.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<PathBuf>;
}
