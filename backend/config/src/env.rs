//! Environment-backed configuration loading.
//!
//! A `.env` file is honored when present (local runs); real deployments
//! set the variables directly. Unset optional variables fall back to the
//! schema defaults. Load failures are fatal at startup.

use std::path::PathBuf;

use lingobot_core::BotError;

use crate::schema::BotConfig;

/// Load the bot configuration from the process environment.
///
/// Fails when a required setting is missing or an optional one is set to
/// an unparsable value.
pub fn load() -> Result<BotConfig, BotError> {
    // Ignore a missing .env file; env vars may come from the deployment.
    let _ = dotenvy::dotenv();

    let defaults = BotConfig::default();

    let gemini_api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => return Err(BotError::Config("GEMINI_API_KEY is not set".to_string())),
    };

    Ok(BotConfig {
        gemini_api_key,
        translate_model: var_or("TRANSLATE_MODEL", defaults.translate_model),
        temperature: parse_var("TRANSLATE_TEMPERATURE", defaults.temperature)?,
        log_level: var_or("LOG_LEVEL", defaults.log_level),
        log_dir: PathBuf::from(var_or(
            "LOG_DIR",
            defaults.log_dir.to_string_lossy().into_owned(),
        )),
        away_message: var_or("AWAY_MESSAGE", defaults.away_message),
        download_cooldown_secs: parse_var("DOWNLOAD_COOLDOWN_SECS", defaults.download_cooldown_secs)?,
        max_media_bytes: parse_var("MAX_MEDIA_BYTES", defaults.max_media_bytes)?,
        command_rate_per_minute: parse_var("COMMAND_RATE_PER_MINUTE", defaults.command_rate_per_minute)?,
    })
}

fn var_or(name: &str, default: String) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, BotError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map_err(|_| BotError::Config(format!("invalid value for {name}: {v}"))),
        _ => Ok(default),
    }
}
