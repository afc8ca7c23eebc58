//! `/meme [subreddit]`: fetch and post a random meme.

use anyhow::Result;
use async_trait::async_trait;

use lingobot_core::MediaKind;

use crate::command::Command;
use crate::context::Context;
use crate::response;
use crate::types::{CommandMetadata, ParamKind, ParameterSpec};

pub struct MemeCommand {
    meta: CommandMetadata,
}

impl MemeCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "meme".to_string(),
            description: "Get a random meme".to_string(),
            category: "Fun".to_string(),
            usage: "/meme [subreddit]".to_string(),
            require_owner: true,
            examples: vec!["/meme".to_string(), "/meme dankmemes".to_string()],
            parameters: vec![ParameterSpec::new(
                "subreddit",
                ParamKind::String,
                "Specific subreddit to get meme from",
            )],
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for MemeCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for MemeCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let subreddit = ctx.args.first().map(String::as_str);

        let status = match subreddit {
            Some(sub) => format!("🔍 Fetching meme from r/{sub}"),
            None => "🔍 Fetching random meme".to_string(),
        };
        ctx.respond(&status).await?;

        let meme = match ctx.caps.memes.fetch_random(subreddit).await {
            Ok(meme) => meme,
            Err(err) => {
                return ctx
                    .respond(&response::error(&format!("Failed to fetch meme: {err}")))
                    .await;
            }
        };

        let image = match ctx.caps.memes.fetch_bytes(&meme.url).await {
            Ok(image) => image,
            Err(err) => {
                return ctx
                    .respond(&response::error(&format!("Failed to download meme: {err}")))
                    .await;
            }
        };

        let caption = format!("r/{}: {}", meme.subreddit, meme.title);
        ctx.caps
            .delivery
            .send_media(&ctx.meta.chat, MediaKind::Image, image, &caption)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{DeliveryCall, TestHarness};
    use lingobot_core::ChatMessage;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn posts_meme_with_subreddit_caption() {
        let harness = TestHarness::new();
        let ctx = harness.context(
            ChatMessage::text("/meme dankmemes"),
            true,
            "meme",
            &["dankmemes"],
            "dankmemes",
        );
        MemeCommand::new().execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert!(matches!(
            calls.last().unwrap(),
            DeliveryCall::Media { caption, .. } if caption == "r/dankmemes: Expanding brain"
        ));
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let harness = TestHarness::new();
        harness.memes.fail.store(true, Ordering::SeqCst);
        let ctx = harness.context(ChatMessage::text("/meme"), true, "meme", &[], "");
        MemeCommand::new().execute(&ctx).await.unwrap();
        let texts = harness.delivery.texts();
        assert!(texts.last().unwrap().contains("Failed to fetch meme"), "{texts:?}");
    }
}
