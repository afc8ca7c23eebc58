//! Config validation: deep checks with user-friendly error messages.

use thiserror::Error;

use crate::schema::BotConfig;

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if config.gemini_api_key.trim().is_empty() {
        report.error("geminiApiKey", "GEMINI_API_KEY must be set");
    }
    if config.translate_model.trim().is_empty() {
        report.error("translateModel", "Translation model id cannot be empty");
    }
    if !(0.0..=1.0).contains(&config.temperature) {
        report.error(
            "temperature",
            format!("Temperature {} outside [0.0, 1.0]", config.temperature),
        );
    }
    if config.command_rate_per_minute == 0 {
        report.error("commandRatePerMinute", "Rate limit must be >= 1 per minute");
    }
    if config.max_media_bytes == 0 {
        report.error("maxMediaBytes", "Media size ceiling must be > 0");
    }
    if config.download_cooldown_secs > 300 {
        report.warn(
            "downloadCooldownSecs",
            "Cooldown above 5 minutes will frustrate users",
        );
    }
    if config.away_message.trim().is_empty() {
        report.warn("awayMessage", "Away message is empty; /afk replies will be blank");
    }

    report
}
