//! yt-dlp subprocess media downloader.
//!
//! Each download runs in its own scratch directory; the returned file
//! path is owned by the caller, including cleanup.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use lingobot_core::{BotError, MediaDownloader};

pub struct YtDlpDownloader {
    binary: String,
}

impl YtDlpDownloader {
    pub fn new() -> Self {
        Self { binary: "yt-dlp".to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDownloader for YtDlpDownloader {
    async fn download(&self, url: &str) -> Result<PathBuf> {
        let scratch = tempfile::Builder::new()
            .prefix("lingobot-download-")
            .tempdir()
            .context("creating download directory")?
            // The caller removes the file and directory after delivery.
            .into_path();
        let template = scratch.join("download.%(ext)s");

        debug!(url = %url, dir = %scratch.display(), "running yt-dlp");
        let output = Command::new(&self.binary)
            .arg("--format")
            .arg("best[height<=720]/best")
            .arg("--no-playlist")
            .arg("--restrict-filenames")
            .arg("--output")
            .arg(&template)
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("spawning {}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("unknown error");
            warn!(url = %url, "yt-dlp failed: {detail}");
            return Err(BotError::Capability(format!("yt-dlp failed: {detail}")).into());
        }

        // yt-dlp substitutes the real extension into the template.
        let mut entries = tokio::fs::read_dir(&scratch)
            .await
            .context("listing download directory")?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() {
                return Ok(path);
            }
        }
        bail!("downloaded file not found in {}", scratch.display())
    }
}
