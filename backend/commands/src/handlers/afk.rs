//! `/afk` and `/noafk`: away-mode toggles.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::away::AwayState;
use crate::command::Command;
use crate::context::Context;
use crate::types::CommandMetadata;

pub struct AfkCommand {
    meta: CommandMetadata,
    away: Arc<AwayState>,
}

impl AfkCommand {
    pub fn new(away: Arc<AwayState>) -> Self {
        let meta = CommandMetadata {
            name: "afk".to_string(),
            description: "Enable AFK mode to send automatic responses".to_string(),
            category: "Utility".to_string(),
            usage: "/afk".to_string(),
            examples: vec!["/afk".to_string()],
            require_owner: true,
            ..CommandMetadata::default()
        };
        Self { meta, away }
    }
}

#[async_trait]
impl Command for AfkCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        self.away.enable();
        ctx.respond("✅ AFK mode enabled. Anyone messaging will receive your AFK message.")
            .await
    }
}

pub struct NoAfkCommand {
    meta: CommandMetadata,
    away: Arc<AwayState>,
}

impl NoAfkCommand {
    pub fn new(away: Arc<AwayState>) -> Self {
        let meta = CommandMetadata {
            name: "noafk".to_string(),
            description: "Disable AFK mode".to_string(),
            category: "Utility".to_string(),
            usage: "/noafk".to_string(),
            examples: vec!["/noafk".to_string()],
            require_owner: true,
            ..CommandMetadata::default()
        };
        Self { meta, away }
    }
}

#[async_trait]
impl Command for NoAfkCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        self.away.disable();
        ctx.respond("❌ AFK mode disabled.").await
    }
}
