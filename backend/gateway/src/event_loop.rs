//! The inbound event loop.
//!
//! Consumes transport events from an mpsc channel and hands each one to
//! the dispatcher on its own task, so a handler blocked on an external
//! call never stalls ingestion of the next event.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use lingobot_commands::Dispatcher;
use lingobot_core::InboundEvent;

pub struct Gateway {
    dispatcher: Arc<Dispatcher>,
}

impl Gateway {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Run until the inbound channel closes.
    pub async fn run(&self, mut rx: mpsc::Receiver<InboundEvent>) {
        while let Some(event) = rx.recv().await {
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                dispatcher.route(event.message, event.meta).await;
            });
        }
        info!("inbound channel closed, gateway stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use lingobot_commands::{
        AwayState, Capabilities, CommandMetadata, Context, Registry, SimpleCommand,
    };
    use lingobot_core::{
        ChatMessage, Delivery, ImageGenerator, LanguageDetector, MediaDownloader, MediaKind,
        MediaRef, Meme, MemeFetcher, MessageMeta, Translator,
    };
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDelivery {
        texts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Delivery for RecordingDelivery {
        async fn send_text(&self, _chat: &str, text: &str) -> Result<()> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }
        async fn send_reply(&self, _chat: &str, text: &str, _quoted_id: &str) -> Result<()> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }
        async fn send_media(
            &self,
            _chat: &str,
            _kind: MediaKind,
            _data: Vec<u8>,
            caption: &str,
        ) -> Result<()> {
            self.texts.lock().unwrap().push(caption.to_string());
            Ok(())
        }
        async fn edit_text(&self, _chat: &str, _message_id: &str, new_text: &str) -> Result<()> {
            self.texts.lock().unwrap().push(new_text.to_string());
            Ok(())
        }
        async fn edit_media_caption(
            &self,
            _chat: &str,
            _message_id: &str,
            new_caption: &str,
            _original: &MediaRef,
        ) -> Result<()> {
            self.texts.lock().unwrap().push(new_caption.to_string());
            Ok(())
        }
    }

    struct NoopTranslator;

    #[async_trait]
    impl Translator for NoopTranslator {
        async fn translate(&self, text: &str, _s: &str, _t: &str) -> Result<String> {
            Ok(text.to_string())
        }
        fn set_model(&self, _m: &str) -> Result<()> {
            Ok(())
        }
        fn model(&self) -> String {
            "noop".into()
        }
        fn set_temperature(&self, _t: f64) -> Result<()> {
            Ok(())
        }
        fn temperature(&self) -> f64 {
            0.0
        }
    }

    struct NoopDetector;
    impl LanguageDetector for NoopDetector {
        fn detect(&self, _text: &str) -> Option<String> {
            Some("en".into())
        }
    }

    struct NoopImages;
    #[async_trait]
    impl ImageGenerator for NoopImages {
        async fn generate(&self, _p: &str) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    struct NoopMemes;
    #[async_trait]
    impl MemeFetcher for NoopMemes {
        async fn fetch_random(&self, _s: Option<&str>) -> Result<Meme> {
            anyhow::bail!("unused")
        }
        async fn fetch_bytes(&self, _u: &str) -> Result<Vec<u8>> {
            anyhow::bail!("unused")
        }
    }

    struct NoopDownloader;
    #[async_trait]
    impl MediaDownloader for NoopDownloader {
        async fn download(&self, _u: &str) -> Result<PathBuf> {
            anyhow::bail!("unused")
        }
    }

    #[tokio::test]
    async fn routes_events_from_the_channel() {
        let delivery = Arc::new(RecordingDelivery::default());
        let caps = Capabilities {
            delivery: delivery.clone(),
            translator: Arc::new(NoopTranslator),
            detector: Arc::new(NoopDetector),
            images: Arc::new(NoopImages),
            memes: Arc::new(NoopMemes),
            downloader: Arc::new(NoopDownloader),
        };

        let registry = Arc::new(Registry::new());
        registry
            .register(Arc::new(SimpleCommand::new(
                CommandMetadata::new("ping", "liveness"),
                |_ctx: &Context| "🏓 Pong!".to_string(),
            )))
            .unwrap();

        let away = Arc::new(AwayState::new("away"));
        let dispatcher = Arc::new(Dispatcher::new(registry, caps, away));
        let gateway = Gateway::new(dispatcher);

        let (tx, rx) = mpsc::channel(8);
        tx.send(InboundEvent {
            message: ChatMessage::text("/ping"),
            meta: MessageMeta::new("chat", "sender", "m1", false),
        })
        .await
        .unwrap();
        drop(tx);

        gateway.run(rx).await;
        // Let the spawned handler task finish.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(delivery.texts.lock().unwrap().clone(), vec!["🏓 Pong!"]);
    }
}
