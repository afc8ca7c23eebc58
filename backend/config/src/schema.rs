//! Runtime configuration for the bot process.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, populated from the environment at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// API key for the Gemini translation/image backend. Required.
    pub gemini_api_key: String,

    /// Translation model id used until `/setmodel` changes it.
    pub translate_model: String,

    /// Sampling temperature used until `/settemp` changes it.
    pub temperature: f64,

    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,

    /// Directory for rolling NDJSON log files.
    pub log_dir: PathBuf,

    /// Auto-reply text sent while away mode is enabled.
    pub away_message: String,

    /// Minimum interval between completed downloads, in seconds.
    pub download_cooldown_secs: u64,

    /// Largest payload deliverable as native media; anything bigger is
    /// re-routed through the generic document path.
    pub max_media_bytes: u64,

    /// Per-sender rate limit applied to the heavier commands.
    pub command_rate_per_minute: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            translate_model: "gemini-2.0-flash".to_string(),
            temperature: 0.2,
            log_level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            away_message: "I'm away right now and will reply later.".to_string(),
            download_cooldown_secs: 5,
            max_media_bytes: 16 * 1024 * 1024,
            command_rate_per_minute: 10,
        }
    }
}
