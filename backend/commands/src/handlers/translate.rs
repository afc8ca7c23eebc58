//! Translation commands, one per supported language.
//!
//! A single implementation serves three message shapes, resolved as an
//! ordered list of guard/action tiers with short-circuit on first match:
//!
//! 1. media-caption: the inbound message is itself media whose caption
//!    carried the directive and text,
//! 2. quoted: a bare directive replying to another message,
//! 3. inline: directive followed by the text to translate.
//!
//! Each tier owns its delivery semantics (reply vs in-place edit).

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use lingobot_core::{Language, RegistrationError, SUPPORTED_LANGUAGES};

use crate::command::Command;
use crate::context::Context;
use crate::registry::Registry;
use crate::response;
use crate::types::CommandMetadata;

pub struct TranslateCommand {
    meta: CommandMetadata,
    target: &'static str,
}

impl TranslateCommand {
    pub fn new(lang: &Language) -> Self {
        let code = lang.code;
        let meta = CommandMetadata {
            name: code.to_string(),
            description: format!("Translate to {}", lang.name),
            category: "Translation".to_string(),
            usage: format!("/{code} <text>"),
            examples: vec![
                format!("/{code} Hello world"),
                format!("Quote a message and reply with /{code}"),
                format!("Media caption: /{code} <text> (returns translation)"),
            ],
            ..CommandMetadata::default()
        };
        Self { meta, target: code }
    }

    /// Detect the source language and translate. Reports stage failures
    /// to the user and returns `None` once a failure has been delivered,
    /// so callers can stop without raising a second message.
    async fn detect_and_translate(&self, ctx: &Context, text: &str) -> Result<Option<String>> {
        let Some(source) = ctx.caps.detector.detect(text) else {
            ctx.respond(&response::error("Could not detect source language"))
                .await?;
            return Ok(None);
        };
        debug!(source = %source, target = %self.target, "translating");
        match ctx.caps.translator.translate(text, &source, self.target).await {
            Ok(translated) => Ok(Some(translated)),
            Err(err) => {
                ctx.respond(&response::error(&format!("Translation failed: {err}")))
                    .await?;
                Ok(None)
            }
        }
    }

    /// Tier 1: the message is media and the caption carried inline text.
    /// Replies with a translation block; the caption itself is never
    /// edited from this tier.
    async fn media_caption_tier(&self, ctx: &Context) -> Result<bool> {
        if !ctx.message.is_media() || ctx.args.is_empty() {
            return Ok(false);
        }

        if let Some(translated) = self.detect_and_translate(ctx, &ctx.raw_args).await? {
            let text = format!(
                "📸 *Caption Translation:*\n{translated}\n\n_💡 Tip: To translate media captions, quote the message and use /{}_",
                self.target
            );
            ctx.reply(&text).await?;
        }
        Ok(true)
    }

    /// Tier 2: bare directive replying to a quoted message.
    async fn quoted_tier(&self, ctx: &Context) -> Result<bool> {
        if !ctx.args.is_empty() {
            return Ok(false);
        }
        let Some(quoted) = ctx.message.quoted.as_deref() else {
            return Ok(false);
        };

        let Some(quoted_text) = quoted.message.content_text() else {
            ctx.respond(&response::warning("Quoted message has no translatable text"))
                .await?;
            return Ok(true);
        };

        let Some(translated) = self.detect_and_translate(ctx, quoted_text).await? else {
            return Ok(true);
        };

        let delivery = &ctx.caps.delivery;
        let chat = &ctx.meta.chat;
        let quoted_media = quoted.message.media.as_ref();

        if ctx.meta.from_self {
            // Own media: rewrite the quoted caption in place, best-effort.
            if let (Some(media), Some(quoted_id)) = (quoted_media, quoted.id.as_deref()) {
                match delivery
                    .edit_media_caption(chat, quoted_id, &translated, &media.reference)
                    .await
                {
                    Ok(()) => return Ok(true),
                    Err(err) => {
                        warn!(error = %err, kind = media.kind.label(), "quoted caption edit failed");
                    }
                }
            } else {
                // Own text message: replace the bare directive itself.
                match delivery
                    .edit_text(chat, &ctx.meta.message_id, &translated)
                    .await
                {
                    Ok(()) => return Ok(true),
                    Err(err) => warn!(error = %err, "message edit failed"),
                }
            }
            // Degrade to a plain reply; the edit failure stays in the log.
            if let Err(err) = ctx.reply(&translated).await {
                warn!(error = %err, "fallback reply failed");
            }
        } else {
            ctx.reply(&translated).await?;
        }
        Ok(true)
    }

    /// Tier 3: inline `/<code> text`. Always replies, never edits.
    async fn inline_tier(&self, ctx: &Context) -> Result<bool> {
        if ctx.args.is_empty() {
            return Ok(false);
        }
        if let Some(translated) = self.detect_and_translate(ctx, &ctx.raw_args).await? {
            ctx.reply(&translated).await?;
        }
        Ok(true)
    }
}

#[async_trait]
impl Command for TranslateCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        if self.media_caption_tier(ctx).await? {
            return Ok(());
        }
        if self.quoted_tier(ctx).await? {
            return Ok(());
        }
        if self.inline_tier(ctx).await? {
            return Ok(());
        }
        bail!("translation failed: no resolution tier matched")
    }
}

/// Register one translate command per supported language.
pub fn register_translation_commands(registry: &Registry) -> Result<(), RegistrationError> {
    for lang in SUPPORTED_LANGUAGES {
        registry.register(Arc::new(TranslateCommand::new(lang)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{DeliveryCall, TestHarness};
    use lingobot_core::{language_by_code, ChatMessage, MediaKind, QuotedMessage};
    use std::sync::atomic::Ordering;

    fn en() -> TranslateCommand {
        TranslateCommand::new(language_by_code("en").unwrap())
    }

    fn quoted_text(text: &str) -> QuotedMessage {
        QuotedMessage {
            id: Some("quoted-1".to_string()),
            sender: Some("friend".to_string()),
            message: ChatMessage::text(text),
        }
    }

    fn quoted_media(caption: &str) -> QuotedMessage {
        QuotedMessage {
            id: Some("quoted-1".to_string()),
            sender: None,
            message: ChatMessage::media(MediaKind::Image, Some(caption.to_string()), "h9"),
        }
    }

    #[tokio::test]
    async fn media_caption_wins_even_with_quote_context() {
        let harness = TestHarness::new();
        let message = ChatMessage::media(MediaKind::Image, Some("/en bonjour".into()), "h1")
            .quoting(quoted_text("hola"));
        let ctx = harness.context(message, false, "en", &["bonjour"], "bonjour");

        en().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            DeliveryCall::Reply { text, .. } => {
                assert!(text.contains("Caption Translation"), "{text}");
                assert!(text.contains("en:bonjour"), "{text}");
            }
            other => panic!("expected reply, got {other:?}"),
        }
        assert!(harness.delivery.edit_calls().is_empty());
    }

    #[tokio::test]
    async fn bare_directive_with_quote_replies_for_other_senders() {
        let harness = TestHarness::new();
        let message = ChatMessage::text("/en").quoting(quoted_text("hola"));
        let ctx = harness.context(message, false, "en", &[], "");

        en().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            DeliveryCall::Reply { text, .. } if text == "en:hola"
        ));
    }

    #[tokio::test]
    async fn bare_directive_with_quote_edits_own_text_message() {
        let harness = TestHarness::new();
        let message = ChatMessage::text("/en").quoting(quoted_text("hola"));
        let ctx = harness.context(message, true, "en", &[], "");

        en().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            DeliveryCall::EditText { message_id, text, .. }
                if message_id == "msg-1" && text == "en:hola"
        ));
    }

    #[tokio::test]
    async fn owner_quoting_media_edits_its_caption() {
        let harness = TestHarness::new();
        let message = ChatMessage::text("/en").quoting(quoted_media("hola"));
        let ctx = harness.context(message, true, "en", &[], "");

        en().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            DeliveryCall::EditCaption { message_id, caption, .. }
                if message_id == "quoted-1" && caption == "en:hola"
        ));
    }

    #[tokio::test]
    async fn caption_edit_failure_degrades_to_reply() {
        let harness = TestHarness::new();
        harness.delivery.fail_caption_edits.store(true, Ordering::SeqCst);
        let message = ChatMessage::text("/en").quoting(quoted_media("hola"));
        let ctx = harness.context(message, true, "en", &[], "");

        en().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            DeliveryCall::Reply { text, .. } if text == "en:hola"
        ));
    }

    #[tokio::test]
    async fn inline_translation_replies_and_never_edits() {
        let harness = TestHarness::new();
        let message = ChatMessage::text("/en bonjour le monde");
        let ctx = harness.context(
            message,
            true,
            "en",
            &["bonjour", "le", "monde"],
            "bonjour le monde",
        );

        en().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            DeliveryCall::Reply { text, .. } if text == "en:bonjour le monde"
        ));
        assert!(harness.delivery.edit_calls().is_empty());
    }

    #[tokio::test]
    async fn empty_quoted_message_warns_and_stops() {
        let harness = TestHarness::new();
        let quoted = QuotedMessage {
            id: Some("quoted-1".to_string()),
            sender: None,
            message: ChatMessage::media(MediaKind::Audio, Some("voice".into()), "h2"),
        };
        let message = ChatMessage::text("/en").quoting(quoted);
        let ctx = harness.context(message, false, "en", &[], "");

        en().execute(&ctx).await.unwrap();

        let texts = harness.delivery.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("no translatable text"), "{texts:?}");
    }

    #[tokio::test]
    async fn detection_failure_aborts_before_translation() {
        let harness = TestHarness::new();
        *harness.detector.answer.lock().unwrap() = None;
        let message = ChatMessage::text("/en zzzz");
        let ctx = harness.context(message, false, "en", &["zzzz"], "zzzz");

        en().execute(&ctx).await.unwrap();

        let texts = harness.delivery.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("Could not detect source language"), "{texts:?}");
    }

    #[tokio::test]
    async fn translation_failure_reports_cause() {
        let harness = TestHarness::new();
        harness.translator.fail.store(true, Ordering::SeqCst);
        let message = ChatMessage::text("/en hola");
        let ctx = harness.context(message, false, "en", &["hola"], "hola");

        en().execute(&ctx).await.unwrap();

        let texts = harness.delivery.texts();
        assert!(texts[0].contains("Translation failed"), "{texts:?}");
    }

    #[tokio::test]
    async fn no_tier_matching_is_an_error() {
        let harness = TestHarness::new();
        // Bare directive: no media, no quote, no args.
        let ctx = harness.context(ChatMessage::text("/en"), false, "en", &[], "");
        let err = en().execute(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("translation failed"));
        assert!(harness.delivery.recorded().is_empty());
    }

    #[test]
    fn registers_every_supported_language() {
        let registry = Registry::new();
        register_translation_commands(&registry).unwrap();
        for lang in SUPPORTED_LANGUAGES {
            assert!(registry.get(lang.code).is_some(), "missing /{}", lang.code);
        }
        assert!(registry.get("xx").is_none());
    }
}
