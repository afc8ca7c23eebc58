//! `s/pattern/replacement/flags`: regex substitution on a quoted message.
//!
//! Flags: `g` replaces every occurrence (default: first only), `i` matches
//! case-insensitively, `c` strikes through each match before appending the
//! replacement.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::command::Command;
use crate::context::Context;
use crate::response;
use crate::types::CommandMetadata;

static SED_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^s/(.*?)/(.*?)/(.*)?$").expect("static pattern"));

pub struct SedCommand {
    meta: CommandMetadata,
}

impl SedCommand {
    pub fn new() -> Self {
        let meta = CommandMetadata {
            name: "s".to_string(),
            description: "Applies a sed-like substitution to a quoted message. \
                          Flags: g - global, i - ignore case, c - strikethrough original text"
                .to_string(),
            category: "Utility".to_string(),
            usage: "s/pattern/replacement/flags or /s s/pattern/replacement/flags".to_string(),
            ..CommandMetadata::default()
        };
        Self { meta }
    }
}

impl Default for SedCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SedCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let Some(quoted) = ctx.message.quoted.as_deref() else {
            return ctx
                .respond("Please quote a message to use the sed command.")
                .await;
        };
        let Some(quoted_text) = quoted.message.content_text() else {
            return ctx
                .respond("Could not extract text from the quoted message.")
                .await;
        };

        let Some(captures) = SED_EXPRESSION.captures(ctx.raw_args.trim()) else {
            return ctx
                .respond(&response::error(
                    "Invalid sed expression. Usage: s/pattern/replacement/flags",
                ))
                .await;
        };
        let pattern = captures.get(1).map_or("", |m| m.as_str());
        let replacement = captures.get(2).map_or("", |m| m.as_str());
        let flags = captures.get(3).map_or("", |m| m.as_str());

        let global = flags.contains('g');
        let cross_out = flags.contains('c');
        let pattern = if flags.contains('i') {
            format!("(?i){pattern}")
        } else {
            pattern.to_string()
        };

        let compiled = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(err) => {
                return ctx
                    .respond(&response::error(&format!("Invalid regex pattern: {err}")))
                    .await;
            }
        };
        debug!(pattern = %compiled, global, cross_out, "applying substitution");

        let limit = if global { 0 } else { 1 };
        let edited = if cross_out {
            compiled.replacen(quoted_text, limit, |caps: &regex::Captures| {
                format!("~{}~{replacement}", &caps[0])
            })
        } else {
            compiled.replacen(quoted_text, limit, replacement)
        };

        if edited == quoted_text {
            return ctx
                .respond("No changes were made. Pattern not found or expression invalid.")
                .await;
        }

        ctx.respond(&edited).await
    }
}
