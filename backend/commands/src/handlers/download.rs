//! `/download <url>`: fetch media from a URL and re-post it in chat.
//!
//! Downloads are serialized process-wide: one in-progress flag plus a
//! completion cooldown, both guarded by the same lock. Payloads over the
//! deliverable media ceiling are re-routed as generic documents instead
//! of being rejected.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use lingobot_core::MediaKind;

use crate::command::Command;
use crate::context::Context;
use crate::response;
use crate::types::{CommandMetadata, ParamKind, ParameterSpec};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "avi"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Default)]
struct DownloadGate {
    in_progress: bool,
    last_completed: Option<Instant>,
}

/// Clears the in-progress flag and starts the cooldown on every exit path.
struct FinishGuard {
    gate: Arc<Mutex<DownloadGate>>,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if let Ok(mut gate) = self.gate.lock() {
            gate.in_progress = false;
            gate.last_completed = Some(Instant::now());
        }
    }
}

pub struct DownloadCommand {
    meta: CommandMetadata,
    gate: Arc<Mutex<DownloadGate>>,
    cooldown: Duration,
    max_media_bytes: u64,
}

impl DownloadCommand {
    pub fn new(cooldown: Duration, max_media_bytes: u64) -> Self {
        let meta = CommandMetadata {
            name: "download".to_string(),
            aliases: vec!["dl".to_string(), "ytdl".to_string()],
            description: "Download media from various platforms".to_string(),
            category: "Utility".to_string(),
            usage: "/download <url>".to_string(),
            examples: vec![
                "/download https://www.youtube.com/watch?v=...".to_string(),
                "/dl https://www.instagram.com/p/...".to_string(),
            ],
            parameters: vec![ParameterSpec::new(
                "url",
                ParamKind::String,
                "Link to download media from",
            )
            .required()],
            ..CommandMetadata::default()
        };
        Self {
            meta,
            gate: Arc::new(Mutex::new(DownloadGate::default())),
            cooldown,
            max_media_bytes,
        }
    }

    /// Claim the download gate, or produce the rejection message.
    fn try_claim(&self) -> Result<FinishGuard, String> {
        let mut gate = self.gate.lock().expect("download gate poisoned");
        if gate.in_progress {
            return Err(response::warning(
                "⏳ A download is already in progress. Please wait for it to complete.",
            ));
        }
        if let Some(last) = gate.last_completed {
            let elapsed = last.elapsed();
            if elapsed < self.cooldown {
                let remaining = (self.cooldown - elapsed).as_secs();
                return Err(response::warning(&format!(
                    "⏱️ Please wait {remaining} seconds before downloading again."
                )));
            }
        }
        gate.in_progress = true;
        Ok(FinishGuard { gate: Arc::clone(&self.gate) })
    }
}

#[async_trait]
impl Command for DownloadCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.meta
    }

    async fn execute(&self, ctx: &Context) -> Result<()> {
        let Some(url) = ctx.args.first() else {
            return ctx.respond(&response::error("Please provide a URL to download")).await;
        };

        let _guard = match self.try_claim() {
            Ok(guard) => guard,
            Err(rejection) => return ctx.respond(&rejection).await,
        };

        debug!(url = %url, "starting download");
        ctx.respond(&response::processing("Starting download...")).await?;

        let path = match ctx.caps.downloader.download(url).await {
            Ok(path) => path,
            Err(err) => {
                return ctx
                    .respond(&response::error(&format!("Download failed: {err}")))
                    .await;
            }
        };

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(err) => {
                return ctx
                    .respond(&response::error(&format!("Failed to read downloaded file: {err}")))
                    .await;
            }
        };
        cleanup(&path).await;

        if data.is_empty() {
            return ctx.respond(&response::error("Downloaded file is empty")).await;
        }

        let size = data.len() as u64;
        let delivery = &ctx.caps.delivery;

        if size > self.max_media_bytes {
            let limit_mb = self.max_media_bytes as f64 / (1024.0 * 1024.0);
            let caption = format!(
                "📥 Downloaded from: {url}\n\n📎 File is {:.1} MB (exceeds {limit_mb:.0}MB limit for media)",
                size as f64 / (1024.0 * 1024.0)
            );
            return delivery
                .send_media(&ctx.meta.chat, MediaKind::Document, data, &caption)
                .await;
        }

        let caption = format!("📥 Downloaded from: {url}");
        let kind = kind_for_extension(&path);
        delivery.send_media(&ctx.meta.chat, kind, data, &caption).await
    }
}

fn kind_for_extension(path: &Path) -> MediaKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else {
        MediaKind::Document
    }
}

/// Remove the downloaded file and, when empty, its scratch directory.
async fn cleanup(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        warn!(error = %err, path = %path.display(), "could not remove downloaded file");
        return;
    }
    if let Some(parent) = path.parent() {
        let _ = tokio::fs::remove_dir(parent).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{DeliveryCall, TestHarness};
    use anyhow::bail;
    use lingobot_core::{ChatMessage, MediaDownloader};
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;

    const MAX: u64 = 16 * 1024 * 1024;

    fn ctx_for(harness: &TestHarness, url: &str) -> Context {
        harness.context(
            ChatMessage::text(format!("/download {url}")),
            true,
            "download",
            &[url],
            url,
        )
    }

    #[tokio::test]
    async fn missing_url_is_reported() {
        let harness = TestHarness::new();
        let cmd = DownloadCommand::new(Duration::from_secs(5), MAX);
        let ctx = harness.context(ChatMessage::text("/download"), true, "download", &[], "");
        cmd.execute(&ctx).await.unwrap();
        let texts = harness.delivery.texts();
        assert!(texts[0].contains("provide a URL"), "{texts:?}");
    }

    #[tokio::test]
    async fn sends_video_for_video_extension() {
        let harness = TestHarness::new();
        let cmd = DownloadCommand::new(Duration::from_secs(0), MAX);
        let ctx = ctx_for(&harness, "https://example.com/clip");
        cmd.execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert!(matches!(
            calls.last().unwrap(),
            DeliveryCall::Media { kind_label, caption, .. }
                if kind_label == "video" && caption.contains("Downloaded from")
        ));
    }

    #[tokio::test]
    async fn oversized_payload_goes_out_as_document() {
        let harness = TestHarness::new();
        *harness.downloader.payload.lock().unwrap() = vec![0u8; 2048];
        // 1 KiB ceiling → the 2 KiB payload must take the document path.
        let cmd = DownloadCommand::new(Duration::from_secs(0), 1024);
        let ctx = ctx_for(&harness, "https://example.com/big");
        cmd.execute(&ctx).await.unwrap();

        let calls = harness.delivery.recorded();
        assert!(matches!(
            calls.last().unwrap(),
            DeliveryCall::Media { kind_label, caption, .. }
                if kind_label == "document" && caption.contains("exceeds")
        ));
    }

    #[tokio::test]
    async fn cooldown_rejects_back_to_back_downloads() {
        let harness = TestHarness::new();
        let cmd = DownloadCommand::new(Duration::from_secs(60), MAX);

        let ctx = ctx_for(&harness, "https://example.com/a");
        cmd.execute(&ctx).await.unwrap();
        let ctx = ctx_for(&harness, "https://example.com/b");
        cmd.execute(&ctx).await.unwrap();

        let texts = harness.delivery.texts();
        assert!(
            texts.last().unwrap().contains("before downloading again"),
            "{texts:?}"
        );
        // Only the first download produced a media send.
        let media_sends = harness
            .delivery
            .recorded()
            .into_iter()
            .filter(|c| matches!(c, DeliveryCall::Media { .. }))
            .count();
        assert_eq!(media_sends, 1);
    }

    #[tokio::test]
    async fn concurrent_download_is_rejected_while_in_progress() {
        struct SlowDownloader;
        #[async_trait]
        impl MediaDownloader for SlowDownloader {
            async fn download(&self, _url: &str) -> Result<PathBuf> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                bail!("slow downloader never finishes in this test")
            }
        }

        let harness = TestHarness::new();
        let cmd = Arc::new(DownloadCommand::new(Duration::from_secs(0), MAX));

        let mut slow_ctx = ctx_for(&harness, "https://example.com/slow");
        slow_ctx.caps.downloader = Arc::new(SlowDownloader);

        let running = {
            let cmd = Arc::clone(&cmd);
            tokio::spawn(async move { cmd.execute(&slow_ctx).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let ctx = ctx_for(&harness, "https://example.com/second");
        cmd.execute(&ctx).await.unwrap();

        let texts = harness.delivery.texts();
        assert!(
            texts.iter().any(|t| t.contains("already in progress")),
            "{texts:?}"
        );
        running.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn downloader_failure_is_reported() {
        let harness = TestHarness::new();
        harness.downloader.fail.store(true, Ordering::SeqCst);
        let cmd = DownloadCommand::new(Duration::from_secs(0), MAX);
        let ctx = ctx_for(&harness, "https://example.com/broken");
        cmd.execute(&ctx).await.unwrap();

        let texts = harness.delivery.texts();
        assert!(texts.last().unwrap().contains("Download failed"), "{texts:?}");
    }
}
