//! `/help [command]`

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::command::Command;
use crate::context::Context;
use crate::registry::Registry;
use crate::types::{CommandMetadata, ParamKind, ParameterSpec};

pub struct HelpCommand {
    meta: CommandMetadata,
    registry: Arc<Registry>,
}

impl HelpCommand {
    pub fn new(registry: Arc<Registry>) -> Self {
        let meta = CommandMetadata {
            name: "help".to_string(),
            description: "Show available commands".to_string(),
            category: "Utility".to_string(),
            usage: "/help [command]".to_string(),
            examples: vec![
                "/help".to_string(),
                "/help en".to_string(),
                "/help image".to_string(),
            ],
            parameters: vec![ParameterSpec::new(
                "command",
                ParamKind::String,
                "Command to get help for",
            )],
            ..CommandMetadata::default()
        };
        Self { meta, registry }
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let help = match ctx.args.first() {
            Some(name) => self.registry.generate_command_help(name),
            None => self.registry.generate_help(),
        };
        ctx.respond(&help).await
    }
}
