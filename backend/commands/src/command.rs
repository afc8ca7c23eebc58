//! The command contract.
//!
//! Every handler kind (simple reply, parameterized, media-producing,
//! middleware-wrapped) is a peer implementing this one narrow interface.

use anyhow::Result;
use async_trait::async_trait;

use crate::context::Context;
use crate::types::CommandMetadata;

#[async_trait]
pub trait Command: Send + Sync {
    /// Declared metadata; stable for the lifetime of the registration.
    fn metadata(&self) -> &CommandMetadata;

    /// Run the command. Errors returned here are logged by the dispatcher
    /// and never reach the transport; anything the user should see must
    /// already have gone through the delivery capability.
    async fn execute(&self, ctx: &Context) -> Result<()>;
}

/// A command that renders a text response from the context.
pub struct SimpleCommand {
    meta: CommandMetadata,
    render: fn(&Context) -> String,
}

impl SimpleCommand {
    pub fn new(meta: CommandMetadata, render: fn(&Context) -> String) -> Self {
        Self { meta, render }
    }
}

#[async_trait]
impl Command for SimpleCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let text = (self.render)(ctx);
        ctx.respond(&text).await
    }
}
