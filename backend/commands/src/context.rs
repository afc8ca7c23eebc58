//! Per-invocation context handed to command handlers.

use std::sync::Arc;

use anyhow::Result;

use lingobot_core::{
    BotError, ChatMessage, Delivery, ImageGenerator, LanguageDetector, MediaDownloader,
    MemeFetcher, MessageMeta, Translator,
};

/// Shared handles to every capability a handler may call out through.
#[derive(Clone)]
pub struct Capabilities {
    pub delivery: Arc<dyn Delivery>,
    pub translator: Arc<dyn Translator>,
    pub detector: Arc<dyn LanguageDetector>,
    pub images: Arc<dyn ImageGenerator>,
    pub memes: Arc<dyn MemeFetcher>,
    pub downloader: Arc<dyn MediaDownloader>,
}

/// Everything a handler needs for one dispatch. Created fresh per
/// invocation and discarded when the handler returns.
pub struct Context {
    /// The inbound message payload.
    pub message: ChatMessage,
    /// Transport-level metadata for the message.
    pub meta: MessageMeta,
    /// Resolved command name (canonical, lowercase).
    pub command: String,
    /// Whitespace-split positional argument tokens.
    pub args: Vec<String>,
    /// The argument text after the command token with interior
    /// whitespace preserved, for handlers that want the unsplit string.
    pub raw_args: String,
    pub caps: Capabilities,
}

impl Context {
    /// Respond to the invoking message: the operator's own messages are
    /// edited in place, everyone else's get a quoted reply.
    pub async fn respond(&self, text: &str) -> Result<()> {
        let sent = if self.meta.from_self {
            self.caps
                .delivery
                .edit_text(&self.meta.chat, &self.meta.message_id, text)
                .await
        } else {
            self.caps
                .delivery
                .send_reply(&self.meta.chat, text, &self.meta.message_id)
                .await
        };
        sent.map_err(|err| BotError::Delivery(err.to_string()).into())
    }

    /// Send a new message quoting the invoking one.
    pub async fn reply(&self, text: &str) -> Result<()> {
        self.caps
            .delivery
            .send_reply(&self.meta.chat, text, &self.meta.message_id)
            .await
            .map_err(|err| BotError::Delivery(err.to_string()).into())
    }
}
