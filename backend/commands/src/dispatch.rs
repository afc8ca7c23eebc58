//! Inbound message routing.
//!
//! Fire-and-forget from the transport's perspective: every user-visible
//! outcome goes through the delivery capability, and handler errors stop
//! at the log. Unrecognized input produces no response at all, so normal
//! conversation in busy chats never triggers the bot.

use std::sync::Arc;

use tracing::{debug, error, warn};

use lingobot_core::{ChatMessage, MessageMeta};

use crate::away::AwayState;
use crate::context::{Capabilities, Context};
use crate::registry::Registry;

/// Leading command marker.
const COMMAND_PREFIX: char = '/';
/// Prefix of a bare substitution expression (`s/pattern/replacement/`).
const SUBSTITUTION_PREFIX: &str = "s/";

pub struct Dispatcher {
    registry: Arc<Registry>,
    caps: Capabilities,
    away: Arc<AwayState>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, caps: Capabilities, away: Arc<AwayState>) -> Self {
        Self { registry, caps, away }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Route one inbound message to a handler, or drop it.
    pub async fn route(&self, message: ChatMessage, meta: MessageMeta) {
        let Some(text) = message.content_text() else {
            return;
        };
        let text = text.trim();

        let parsed = if text.starts_with(SUBSTITUTION_PREFIX) {
            // A bare substitution expression routes to the "s" command
            // with the whole expression as its raw argument text.
            Some((
                "s".to_string(),
                text.split_whitespace().map(str::to_string).collect(),
                text.to_string(),
            ))
        } else if let Some(stripped) = text.strip_prefix(COMMAND_PREFIX) {
            let (head, rest) = stripped
                .split_once(char::is_whitespace)
                .unwrap_or((stripped, ""));
            let rest = rest.trim();
            let name = head.to_lowercase();
            if name.is_empty() {
                None
            } else {
                Some((
                    name,
                    rest.split_whitespace().map(str::to_string).collect(),
                    rest.to_string(),
                ))
            }
        } else {
            None
        };

        let Some((command, args, raw_args)) = parsed else {
            self.handle_plain_message(&meta).await;
            return;
        };

        // Translation directives are registered as commands, one per
        // supported language, so a bare two-letter token resolves through
        // the same lookup; an unrecognized code falls through to silence.
        let Some(cmd) = self.registry.get(&command) else {
            debug!(command = %command, "unrecognized command, ignoring");
            return;
        };

        let ctx = Context {
            message,
            meta,
            command,
            args,
            raw_args,
            caps: self.caps.clone(),
        };

        if let Err(err) = cmd.execute(&ctx).await {
            error!(command = %ctx.command, error = %err, "command failed");
        }
    }

    /// Non-command traffic: the only reaction is the away auto-reply.
    async fn handle_plain_message(&self, meta: &MessageMeta) {
        if meta.from_self {
            return;
        }
        if self.away.should_notify(&meta.sender) {
            if let Err(err) = self
                .caps
                .delivery
                .send_reply(&meta.chat, self.away.message(), &meta.message_id)
                .await
            {
                warn!(error = %err, "away auto-reply failed");
            }
        }
    }
}
