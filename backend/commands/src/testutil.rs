//! In-memory capability fakes for handler tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use lingobot_core::{
    ChatMessage, Delivery, ImageGenerator, LanguageDetector, MediaDownloader, MediaKind, MediaRef,
    Meme, MemeFetcher, MessageMeta, Translator,
};

use crate::context::{Capabilities, Context};

/// One recorded outbound delivery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryCall {
    Text { chat: String, text: String },
    Reply { chat: String, text: String, quoted_id: String },
    Media { chat: String, kind_label: String, caption: String, bytes: usize },
    EditText { chat: String, message_id: String, text: String },
    EditCaption { chat: String, message_id: String, caption: String },
}

/// Records every delivery call; edits can be made to fail on demand.
#[derive(Default)]
pub struct MockDelivery {
    pub calls: Mutex<Vec<DeliveryCall>>,
    pub fail_edits: AtomicBool,
    pub fail_caption_edits: AtomicBool,
}

impl MockDelivery {
    pub fn recorded(&self) -> Vec<DeliveryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// All textual payloads, in order, regardless of call kind.
    pub fn texts(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .map(|c| match c {
                DeliveryCall::Text { text, .. } => text,
                DeliveryCall::Reply { text, .. } => text,
                DeliveryCall::Media { caption, .. } => caption,
                DeliveryCall::EditText { text, .. } => text,
                DeliveryCall::EditCaption { caption, .. } => caption,
            })
            .collect()
    }

    pub fn edit_calls(&self) -> Vec<DeliveryCall> {
        self.recorded()
            .into_iter()
            .filter(|c| {
                matches!(c, DeliveryCall::EditText { .. } | DeliveryCall::EditCaption { .. })
            })
            .collect()
    }

    fn record(&self, call: DeliveryCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Delivery for MockDelivery {
    async fn send_text(&self, chat: &str, text: &str) -> Result<()> {
        self.record(DeliveryCall::Text { chat: chat.into(), text: text.into() });
        Ok(())
    }

    async fn send_reply(&self, chat: &str, text: &str, quoted_id: &str) -> Result<()> {
        self.record(DeliveryCall::Reply {
            chat: chat.into(),
            text: text.into(),
            quoted_id: quoted_id.into(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &str,
        kind: MediaKind,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        self.record(DeliveryCall::Media {
            chat: chat.into(),
            kind_label: kind.label().into(),
            caption: caption.into(),
            bytes: data.len(),
        });
        Ok(())
    }

    async fn edit_text(&self, chat: &str, message_id: &str, new_text: &str) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            bail!("edit rejected by transport");
        }
        self.record(DeliveryCall::EditText {
            chat: chat.into(),
            message_id: message_id.into(),
            text: new_text.into(),
        });
        Ok(())
    }

    async fn edit_media_caption(
        &self,
        chat: &str,
        message_id: &str,
        new_caption: &str,
        _original: &MediaRef,
    ) -> Result<()> {
        if self.fail_caption_edits.load(Ordering::SeqCst) {
            bail!("caption edit rejected by transport");
        }
        self.record(DeliveryCall::EditCaption {
            chat: chat.into(),
            message_id: message_id.into(),
            caption: new_caption.into(),
        });
        Ok(())
    }
}

/// Deterministic translator: `"{target}:{text}"`, with mutable model and
/// temperature state.
pub struct MockTranslator {
    pub fail: AtomicBool,
    model: Mutex<String>,
    temperature: Mutex<f64>,
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self {
            fail: AtomicBool::new(false),
            model: Mutex::new("gemini-2.0-flash".to_string()),
            temperature: Mutex::new(0.2),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("backend unavailable");
        }
        Ok(format!("{target}:{text}"))
    }

    fn set_model(&self, model_id: &str) -> Result<()> {
        if model_id.trim().is_empty() {
            bail!("empty model id");
        }
        *self.model.lock().unwrap() = model_id.to_string();
        Ok(())
    }

    fn model(&self) -> String {
        self.model.lock().unwrap().clone()
    }

    fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&temperature) {
            bail!("temperature out of range");
        }
        *self.temperature.lock().unwrap() = temperature;
        Ok(())
    }

    fn temperature(&self) -> f64 {
        *self.temperature.lock().unwrap()
    }
}

/// Fixed-answer detector; set to `None` to simulate detection failure.
pub struct MockDetector {
    pub answer: Mutex<Option<String>>,
}

impl Default for MockDetector {
    fn default() -> Self {
        Self { answer: Mutex::new(Some("es".to_string())) }
    }
}

impl LanguageDetector for MockDetector {
    fn detect(&self, _text: &str) -> Option<String> {
        self.answer.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct MockImageGenerator {
    pub fail: AtomicBool,
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Vec<u8>> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("image backend unavailable");
        }
        Ok(vec![0xFF, 0xD8, 0xFF])
    }
}

#[derive(Default)]
pub struct MockMemeFetcher {
    pub fail: AtomicBool,
}

#[async_trait]
impl MemeFetcher for MockMemeFetcher {
    async fn fetch_random(&self, subreddit: Option<&str>) -> Result<Meme> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("meme api unavailable");
        }
        Ok(Meme {
            title: "Expanding brain".to_string(),
            url: "https://img.example/meme.jpg".to_string(),
            subreddit: subreddit.unwrap_or("memes").to_string(),
        })
    }

    async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(vec![1, 2, 3, 4])
    }
}

/// Writes `payload` to a temp file and hands back its path.
pub struct MockDownloader {
    pub payload: Mutex<Vec<u8>>,
    pub extension: Mutex<String>,
    pub fail: AtomicBool,
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self {
            payload: Mutex::new(vec![0u8; 64]),
            extension: Mutex::new("mp4".to_string()),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MediaDownloader for MockDownloader {
    async fn download(&self, _url: &str) -> Result<PathBuf> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("downloader unavailable");
        }
        let ext = self.extension.lock().unwrap().clone();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_nanos();
        let path = std::env::temp_dir().join(format!("lingobot-test-{nanos}.{ext}"));
        std::fs::write(&path, self.payload.lock().unwrap().as_slice())?;
        Ok(path)
    }
}

/// All fakes bundled with a ready-made capability set.
pub struct TestHarness {
    pub caps: Capabilities,
    pub delivery: Arc<MockDelivery>,
    pub translator: Arc<MockTranslator>,
    pub detector: Arc<MockDetector>,
    pub images: Arc<MockImageGenerator>,
    pub memes: Arc<MockMemeFetcher>,
    pub downloader: Arc<MockDownloader>,
}

impl TestHarness {
    pub fn new() -> Self {
        let delivery = Arc::new(MockDelivery::default());
        let translator = Arc::new(MockTranslator::default());
        let detector = Arc::new(MockDetector::default());
        let images = Arc::new(MockImageGenerator::default());
        let memes = Arc::new(MockMemeFetcher::default());
        let downloader = Arc::new(MockDownloader::default());
        let caps = Capabilities {
            delivery: delivery.clone(),
            translator: translator.clone(),
            detector: detector.clone(),
            images: images.clone(),
            memes: memes.clone(),
            downloader: downloader.clone(),
        };
        Self { caps, delivery, translator, detector, images, memes, downloader }
    }

    /// Context with full control over message shape and arguments.
    pub fn context(
        &self,
        message: ChatMessage,
        from_self: bool,
        command: &str,
        args: &[&str],
        raw_args: &str,
    ) -> Context {
        Context {
            message,
            meta: MessageMeta::new("chat-1", "sender-1", "msg-1", from_self),
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            raw_args: raw_args.to_string(),
            caps: self.caps.clone(),
        }
    }
}

/// Bare `/command` context from a non-owner sender.
pub fn context_from_user(harness: &TestHarness, command: &str) -> Context {
    harness.context(ChatMessage::text(format!("/{command}")), false, command, &[], "")
}

/// Bare `/command` context from the operator's own account.
pub fn context_from_self(harness: &TestHarness, command: &str) -> Context {
    harness.context(ChatMessage::text(format!("/{command}")), true, command, &[], "")
}
