//! Console transport for local runs.
//!
//! Lines typed on stdin become inbound events from the operator's own
//! account; deliveries are printed to stdout. Useful for exercising the
//! command surface without a live chat transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use lingobot_core::{ChatMessage, Delivery, InboundEvent, MediaKind, MediaRef, MessageMeta};

const CONSOLE_CHAT: &str = "console";
const CONSOLE_SENDER: &str = "operator";

/// Prints every delivery to stdout.
pub struct ConsoleDelivery;

#[async_trait]
impl Delivery for ConsoleDelivery {
    async fn send_text(&self, chat: &str, text: &str) -> Result<()> {
        println!("[{chat}] {text}");
        Ok(())
    }

    async fn send_reply(&self, chat: &str, text: &str, quoted_id: &str) -> Result<()> {
        println!("[{chat}] (reply to {quoted_id}) {text}");
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &str,
        kind: MediaKind,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        println!("[{chat}] <{} {} bytes> {caption}", kind.label(), data.len());
        Ok(())
    }

    async fn edit_text(&self, chat: &str, message_id: &str, new_text: &str) -> Result<()> {
        println!("[{chat}] (edit {message_id}) {new_text}");
        Ok(())
    }

    async fn edit_media_caption(
        &self,
        chat: &str,
        message_id: &str,
        new_caption: &str,
        original: &MediaRef,
    ) -> Result<()> {
        println!(
            "[{chat}] (caption edit {message_id}, {}) {new_caption}",
            original.kind.label()
        );
        Ok(())
    }
}

/// Reads stdin lines and feeds them to the gateway as operator messages.
pub struct ConsoleTransport {
    next_id: AtomicU64,
}

impl ConsoleTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { next_id: AtomicU64::new(1) })
    }

    pub async fn run(self: Arc<Self>, tx: mpsc::Sender<InboundEvent>) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                    let event = InboundEvent {
                        message: ChatMessage::text(line),
                        meta: MessageMeta::new(
                            CONSOLE_CHAT,
                            CONSOLE_SENDER,
                            format!("console-{id}"),
                            true,
                        ),
                    };
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
                Ok(None) => return,
                Err(err) => {
                    warn!(error = %err, "stdin read failed");
                    return;
                }
            }
        }
    }
}
