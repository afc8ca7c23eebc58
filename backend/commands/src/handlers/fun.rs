//! Emoji animations: `/randmoji` and `/haha`.
//!
//! Both run as detached background tasks performing a bounded sequence of
//! message edits on a fixed cadence. The `AnimationArena` keys exclusivity
//! by chat: a second animation in the same chat is rejected while one is
//! running, but unrelated chats animate independently. The slot is
//! released when the task's guard drops, on every exit path.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::warn;

use lingobot_core::Delivery;

use crate::command::Command;
use crate::context::Context;
use crate::params::parse_parameters;
use crate::response;
use crate::types::{CommandMetadata, ParamKind, ParamValue, ParameterSpec};

const EMOJIS: &[&str] = &[
    "😀", "😅", "😂", "🤣", "😊", "😎", "😇", "🤔", "😴", "🥳", "😱", "🤖", "👻", "🎃", "🐒",
    "🐸", "🦆", "🐙", "🌵", "🍕", "🍩", "⚽", "🎲", "🎸", "🚀", "🌈", "⭐", "🔥", "💧", "🍀",
];

/// Per-chat running-animation registry.
#[derive(Default)]
pub struct AnimationArena {
    running: Mutex<HashSet<String>>,
}

impl AnimationArena {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the animation slot for a chat. Returns `None` while another
    /// animation is active in the same chat.
    pub fn try_acquire(arena: &Arc<Self>, chat: &str) -> Option<AnimationSlot> {
        let mut running = arena.running.lock().expect("arena lock poisoned");
        if !running.insert(chat.to_string()) {
            return None;
        }
        Some(AnimationSlot { arena: Arc::clone(arena), chat: chat.to_string() })
    }
}

/// Held for the duration of one animation; releases the chat's slot on
/// drop, so early returns and panics in the task cannot leak it.
pub struct AnimationSlot {
    arena: Arc<AnimationArena>,
    chat: String,
}

impl Drop for AnimationSlot {
    fn drop(&mut self) {
        if let Ok(mut running) = self.arena.running.lock() {
            running.remove(&self.chat);
        }
    }
}

fn random_emoji() -> &'static str {
    let mut rng = rand::thread_rng();
    EMOJIS.choose(&mut rng).copied().unwrap_or("🎲")
}

async fn edit_frame(delivery: &Arc<dyn Delivery>, chat: &str, message_id: &str, frame: &str) {
    if let Err(err) = delivery.edit_text(chat, message_id, &format!("```{frame}```")).await {
        warn!(error = %err, "animation frame edit failed");
    }
}

// ---------------------------------------------------------------------------
// /randmoji
// ---------------------------------------------------------------------------

pub struct RandmojiCommand {
    meta: CommandMetadata,
    arena: Arc<AnimationArena>,
    cadence: Duration,
}

fn cycles_validator(value: &str) -> Result<(), String> {
    let cycles: i64 = value.parse().map_err(|_| "not a number".to_string())?;
    if !(1..=10).contains(&cycles) {
        return Err("duration must be between 1 and 10".to_string());
    }
    Ok(())
}

impl RandmojiCommand {
    pub fn new(arena: Arc<AnimationArena>) -> Self {
        Self::with_cadence(arena, Duration::from_millis(500))
    }

    pub fn with_cadence(arena: Arc<AnimationArena>, cadence: Duration) -> Self {
        let meta = CommandMetadata {
            name: "randmoji".to_string(),
            description: "Display random emojis".to_string(),
            category: "Fun".to_string(),
            usage: "/randmoji [duration]".to_string(),
            require_owner: true,
            hidden: true,
            examples: vec!["/randmoji".to_string(), "/randmoji 5".to_string()],
            parameters: vec![ParameterSpec::new(
                "duration",
                ParamKind::Int,
                "Number of cycles (1-10)",
            )
            .default_value(ParamValue::Int(10))
            .validator(cycles_validator)],
            ..CommandMetadata::default()
        };
        Self { meta, arena, cadence }
    }
}

#[async_trait]
impl Command for RandmojiCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let params = match parse_parameters(&self.meta.parameters, &ctx.args) {
            Ok(params) => params,
            Err(err) => return ctx.respond(&response::error(&err.to_string())).await,
        };
        let cycles = params.get("duration").and_then(|v| v.as_int()).unwrap_or(10);

        let Some(slot) = AnimationArena::try_acquire(&self.arena, &ctx.meta.chat) else {
            return ctx.respond(&response::warning("Randmoji is already running")).await;
        };

        let delivery = Arc::clone(&ctx.caps.delivery);
        let chat = ctx.meta.chat.clone();
        let message_id = ctx.meta.message_id.clone();
        let cadence = self.cadence;

        tokio::spawn(async move {
            let _slot = slot;
            for _ in 0..cycles {
                for _ in 0..3 {
                    tokio::time::sleep(cadence).await;
                    edit_frame(&delivery, &chat, &message_id, random_emoji()).await;
                }
            }
        });

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// /haha
// ---------------------------------------------------------------------------

pub struct HahaCommand {
    meta: CommandMetadata,
    arena: Arc<AnimationArena>,
    escalate_cadence: Duration,
    descend_cadence: Duration,
}

impl HahaCommand {
    pub fn new(arena: Arc<AnimationArena>) -> Self {
        Self::with_cadence(arena, Duration::from_millis(300), Duration::from_millis(150))
    }

    pub fn with_cadence(
        arena: Arc<AnimationArena>,
        escalate_cadence: Duration,
        descend_cadence: Duration,
    ) -> Self {
        let meta = CommandMetadata {
            name: "haha".to_string(),
            description: "Laughing emoji animation".to_string(),
            category: "Fun".to_string(),
            usage: "/haha".to_string(),
            require_owner: true,
            hidden: true,
            ..CommandMetadata::default()
        };
        Self { meta, arena, escalate_cadence, descend_cadence }
    }
}

#[async_trait]
impl Command for HahaCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let Some(slot) = AnimationArena::try_acquire(&self.arena, &ctx.meta.chat) else {
            return ctx.respond(&response::warning("Haha is already running")).await;
        };

        let delivery = Arc::clone(&ctx.caps.delivery);
        let chat = ctx.meta.chat.clone();
        let message_id = ctx.meta.message_id.clone();
        let escalate = self.escalate_cadence;
        let descend = self.descend_cadence;

        tokio::spawn(async move {
            let _slot = slot;
            let mut laughter: Vec<char> = Vec::new();
            for _ in 0..3 {
                for _ in 0..3 {
                    laughter.push('😂');
                    tokio::time::sleep(escalate).await;
                    let frame: String = laughter.iter().collect();
                    edit_frame(&delivery, &chat, &message_id, &frame).await;
                }
            }
            // Take it back down to a single emoji.
            while laughter.len() > 1 {
                laughter.pop();
                tokio::time::sleep(descend).await;
                let frame: String = laughter.iter().collect();
                edit_frame(&delivery, &chat, &message_id, &frame).await;
            }
        });

        Ok(())
    }
}
