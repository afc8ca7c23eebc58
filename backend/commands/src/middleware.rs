//! Cross-cutting command policies.
//!
//! A middleware wraps a command without changing its declared metadata:
//! `metadata()` delegates to the wrapped command, `execute` intercepts.
//! `with_middleware(cmd, [m1, m2])` applies m2 innermost and m1 outermost,
//! so m1 runs first and decides whether to call onward.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;

use crate::command::Command;
use crate::context::Context;
use crate::response;
use crate::types::CommandMetadata;

/// A transform from one command to a wrapped command.
pub type Middleware = Box<dyn Fn(Arc<dyn Command>) -> Arc<dyn Command> + Send + Sync>;

/// Wrap `cmd` with the given middleware, first entry outermost.
pub fn with_middleware(cmd: Arc<dyn Command>, middleware: Vec<Middleware>) -> Arc<dyn Command> {
    let mut cmd = cmd;
    for m in middleware.iter().rev() {
        cmd = m(cmd);
    }
    cmd
}

// ---------------------------------------------------------------------------
// Owner gate
// ---------------------------------------------------------------------------

struct RequireOwner {
    inner: Arc<dyn Command>,
}

#[async_trait]
impl Command for RequireOwner {
    fn metadata(&self) -> &CommandMetadata {
        self.inner.metadata()
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        if !ctx.meta.from_self {
            return ctx
                .respond(&response::error("This command requires owner permissions"))
                .await;
        }
        self.inner.execute(ctx).await
    }
}

/// Short-circuit with a permission-denied response unless the invoking
/// message came from the bot operator's own account.
pub fn require_owner() -> Middleware {
    Box::new(|inner| Arc::new(RequireOwner { inner }))
}

// ---------------------------------------------------------------------------
// Per-sender rate limit
// ---------------------------------------------------------------------------

struct RateLimit {
    inner: Arc<dyn Command>,
    min_interval: Duration,
    // Grows for the lifetime of the process; accepted tradeoff for a
    // long-lived single-process bot.
    last_used: Mutex<HashMap<String, Instant>>,
}

#[async_trait]
impl Command for RateLimit {
    fn metadata(&self) -> &CommandMetadata {
        self.inner.metadata()
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let wait = {
            let mut last_used = self.last_used.lock().expect("rate limit lock poisoned");
            let now = Instant::now();
            match last_used.get(&ctx.meta.sender) {
                Some(last) if now.duration_since(*last) < self.min_interval => {
                    Some(self.min_interval - now.duration_since(*last))
                }
                _ => {
                    last_used.insert(ctx.meta.sender.clone(), now);
                    None
                }
            }
        };

        if let Some(remaining) = wait {
            return ctx
                .respond(&format!(
                    "⏱️ Please wait {} seconds before using this command again",
                    remaining.as_secs()
                ))
                .await;
        }
        self.inner.execute(ctx).await
    }
}

/// Allow at most `per_minute` calls per sender: the minimum interval
/// between accepted calls is 60s / per_minute. Wall-clock based, not
/// persisted across restarts.
pub fn rate_limit(per_minute: u32) -> Middleware {
    let min_interval = Duration::from_secs(60) / per_minute.max(1);
    Box::new(move |inner| {
        Arc::new(RateLimit {
            inner,
            min_interval,
            last_used: Mutex::new(HashMap::new()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::SimpleCommand;
    use crate::testutil::{context_from_self, context_from_user, TestHarness};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        meta: CommandMetadata,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Command for Counting {
        fn metadata(&self) -> &CommandMetadata {
            &self.meta
        }

        async fn execute(&self, _ctx: &Context) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn require_owner_blocks_other_senders() {
        let harness = TestHarness::new();
        let inner = Arc::new(Counting {
            meta: CommandMetadata::new("ping", "ping"),
            calls: AtomicUsize::new(0),
        });
        let gated = with_middleware(inner.clone(), vec![require_owner()]);

        let ctx = context_from_user(&harness, "ping");
        gated.execute(&ctx).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
        let sent = harness.delivery.texts();
        assert!(sent[0].contains("owner permissions"), "{sent:?}");

        let ctx = context_from_self(&harness, "ping");
        gated.execute(&ctx).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limit_rejects_second_call_within_interval() {
        let harness = TestHarness::new();
        let inner = Arc::new(Counting {
            meta: CommandMetadata::new("meme", "meme"),
            calls: AtomicUsize::new(0),
        });
        // 2/minute → 30s minimum interval.
        let limited = with_middleware(inner.clone(), vec![rate_limit(2)]);

        let ctx = context_from_user(&harness, "meme");
        limited.execute(&ctx).await.unwrap();
        limited.execute(&ctx).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 1, "second call must not forward");
        let sent = harness.delivery.texts();
        // interval 30s minus the microseconds already elapsed, floored.
        let rejection = sent.last().unwrap();
        assert!(
            rejection.contains("wait 29 seconds") || rejection.contains("wait 30 seconds"),
            "{sent:?}"
        );
    }

    #[tokio::test]
    async fn rate_limit_is_per_sender() {
        let harness = TestHarness::new();
        let inner = Arc::new(Counting {
            meta: CommandMetadata::new("meme", "meme"),
            calls: AtomicUsize::new(0),
        });
        let limited = with_middleware(inner.clone(), vec![rate_limit(1)]);

        let mut ctx = context_from_user(&harness, "meme");
        limited.execute(&ctx).await.unwrap();
        ctx.meta.sender = "someone-else".to_string();
        limited.execute(&ctx).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn middleware_preserves_metadata() {
        let meta = CommandMetadata::new("ping", "ping description");
        let cmd: Arc<dyn Command> = Arc::new(SimpleCommand::new(meta, |_| "pong".into()));
        let wrapped = with_middleware(cmd, vec![require_owner(), rate_limit(5)]);
        assert_eq!(wrapped.metadata().name, "ping");
        assert_eq!(wrapped.metadata().description, "ping description");
    }
}
