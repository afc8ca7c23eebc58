//! `/ping` and `/supportedlangs`.

use anyhow::Result;
use async_trait::async_trait;

use lingobot_core::SUPPORTED_LANGUAGES;

use crate::command::Command;
use crate::context::Context;
use crate::response::ResponseBuilder;
use crate::types::CommandMetadata;

pub struct PingCommand {
    meta: CommandMetadata,
}

impl PingCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "ping".to_string(),
            description: "Check bot responsiveness".to_string(),
            category: "Utility".to_string(),
            usage: "/ping".to_string(),
            require_owner: true,
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for PingCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for PingCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let latency = ctx.meta.received_at.elapsed();
        ctx.respond(&format!("🏓 Pong! Latency: {latency:?}")).await
    }
}

pub struct SupportedLangsCommand {
    meta: CommandMetadata,
}

impl SupportedLangsCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "supportedlangs".to_string(),
            aliases: vec!["langs".to_string(), "languages".to_string()],
            description: "Show supported translation languages".to_string(),
            category: "Utility".to_string(),
            usage: "/supportedlangs".to_string(),
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for SupportedLangsCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SupportedLangsCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let mut langs: Vec<_> = SUPPORTED_LANGUAGES.iter().collect();
        langs.sort_by_key(|l| l.name);

        let mut builder = ResponseBuilder::new();
        builder.add_heading("Supported Languages");
        builder.add_list(langs.iter().map(|l| format!("*/{}* - {}", l.code, l.name)));
        builder.add_empty_line();
        builder.add_italic("Use any language code above to translate text to that language");

        ctx.respond(&builder.build()).await
    }
}
