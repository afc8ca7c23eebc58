//! `/image <prompt>`: AI image generation.

use anyhow::Result;
use async_trait::async_trait;

use lingobot_core::MediaKind;

use crate::command::Command;
use crate::context::Context;
use crate::response;
use crate::types::{CommandMetadata, ParamKind, ParameterSpec};

fn prompt_validator(value: &str) -> Result<(), String> {
    if value.trim().len() < 3 {
        return Err("prompt must be at least 3 characters".to_string());
    }
    Ok(())
}

pub struct ImageCommand {
    meta: CommandMetadata,
}

impl ImageCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "image".to_string(),
            aliases: vec!["img".to_string(), "generate".to_string()],
            description: "Generate an AI image from prompt".to_string(),
            category: "Fun".to_string(),
            usage: "/image <prompt>".to_string(),
            require_owner: true,
            examples: vec![
                "/image a beautiful sunset over mountains".to_string(),
                "/image cyberpunk city at night".to_string(),
            ],
            parameters: vec![ParameterSpec::new(
                "prompt",
                ParamKind::String,
                "Description of the image to generate",
            )
            .required()
            .validator(prompt_validator)],
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for ImageCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for ImageCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        if ctx.args.is_empty() {
            return ctx
                .respond(&response::error("Please provide a prompt for image generation"))
                .await;
        }
        let prompt = ctx.raw_args.as_str();
        if let Err(detail) = prompt_validator(prompt) {
            return ctx.respond(&response::error(&format!("invalid prompt: {detail}"))).await;
        }

        ctx.respond(&response::processing(&format!("Generating image: {prompt}")))
            .await?;

        let image = match ctx.caps.images.generate(prompt).await {
            Ok(image) => image,
            Err(err) => {
                return ctx
                    .respond(&response::error(&format!("Failed to generate image: {err}")))
                    .await;
            }
        };

        ctx.caps
            .delivery
            .send_media(&ctx.meta.chat, MediaKind::Image, image, prompt)
            .await
    }
}
