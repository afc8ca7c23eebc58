//! Inbound message model.
//!
//! The transport hands the core one [`InboundEvent`] per received message.
//! The shapes here are transport-neutral: a message is text, media with an
//! optional caption, or either of those plus a reference to a quoted
//! message it replies to.

use std::time::Instant;

/// Kind of media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Document,
    Audio,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
            MediaKind::Audio => "audio",
        }
    }
}

/// Opaque handle the transport needs to re-send a media payload when
/// editing its caption in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub handle: String,
}

/// Media payload descriptor carried on a message.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaContent {
    pub kind: MediaKind,
    pub caption: Option<String>,
    pub reference: MediaRef,
}

/// A message quoted (replied to) by another message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotedMessage {
    /// Transport id of the quoted message, when known.
    pub id: Option<String>,
    /// Sender of the quoted message, when known.
    pub sender: Option<String>,
    pub message: ChatMessage,
}

/// The content of one chat message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatMessage {
    /// Plain conversation text, if this is a text message.
    pub body: Option<String>,
    /// Media payload, if this is a media message.
    pub media: Option<MediaContent>,
    /// The message this one replies to, when the transport carries one.
    pub quoted: Option<Box<QuotedMessage>>,
}

impl ChatMessage {
    /// A plain text message.
    pub fn text(body: impl Into<String>) -> Self {
        Self { body: Some(body.into()), ..Self::default() }
    }

    /// A media message with an optional caption.
    pub fn media(kind: MediaKind, caption: Option<String>, handle: impl Into<String>) -> Self {
        Self {
            media: Some(MediaContent {
                kind,
                caption,
                reference: MediaRef { kind, handle: handle.into() },
            }),
            ..Self::default()
        }
    }

    /// Attach a quoted message.
    pub fn quoting(mut self, quoted: QuotedMessage) -> Self {
        self.quoted = Some(Box::new(quoted));
        self
    }

    pub fn is_media(&self) -> bool {
        self.media.is_some()
    }

    /// The translatable text of this message: the body for text messages,
    /// the caption for media. Audio carries no translatable text.
    pub fn content_text(&self) -> Option<&str> {
        if let Some(body) = self.body.as_deref() {
            if !body.is_empty() {
                return Some(body);
            }
        }
        match &self.media {
            Some(media) if media.kind != MediaKind::Audio => {
                media.caption.as_deref().filter(|c| !c.is_empty())
            }
            _ => None,
        }
    }
}

/// Transport-level metadata for one inbound message.
#[derive(Debug, Clone)]
pub struct MessageMeta {
    /// Chat (conversation) identifier.
    pub chat: String,
    /// Sender identity.
    pub sender: String,
    /// Transport id of this message.
    pub message_id: String,
    /// True when the message was sent from the bot operator's own account.
    pub from_self: bool,
    /// When the event entered the core, for latency reporting.
    pub received_at: Instant,
}

impl MessageMeta {
    pub fn new(
        chat: impl Into<String>,
        sender: impl Into<String>,
        message_id: impl Into<String>,
        from_self: bool,
    ) -> Self {
        Self {
            chat: chat.into(),
            sender: sender.into(),
            message_id: message_id.into(),
            from_self,
            received_at: Instant::now(),
        }
    }
}

/// One inbound transport event: a message plus its metadata.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub message: ChatMessage,
    pub meta: MessageMeta,
}
