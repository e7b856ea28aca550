// src/utils/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::error::AppError;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RENDER_WAIT_SECS: u64 = 15;

/// Process-wide settings, read once at startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token used by the notifier.
    pub bot_token: Option<String>,
    /// Chat that receives alerts.
    pub chat_id: Option<String>,
    /// Local Chrome/Chromium binary; chromiumoxide's own lookup is used when unset.
    pub chrome_executable: Option<PathBuf>,
    /// Upper bound for every plain HTTP request.
    pub http_timeout: Duration,
    /// How long the rendered strategy waits for the heading to appear.
    pub render_wait: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            chrome_executable: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            render_wait: Duration::from_secs(DEFAULT_RENDER_WAIT_SECS),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN");
        let chat_id = get("TELEGRAM_CHAT_ID");
        if bot_token.is_none() || chat_id.is_none() {
            tracing::warn!("Telegram credentials incomplete; alerts will not be delivered");
        }

        Ok(Self {
            bot_token,
            chat_id,
            chrome_executable: get("CHROME_EXECUTABLE").map(PathBuf::from),
            http_timeout: parse_secs(get("NISAB_HTTP_TIMEOUT_SECS"), "NISAB_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            render_wait: parse_secs(get("NISAB_RENDER_WAIT_SECS"), "NISAB_RENDER_WAIT_SECS", DEFAULT_RENDER_WAIT_SECS)?,
        })
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<Duration, AppError> {
    match raw {
        None => Ok(Duration::from_secs(default)),
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| AppError::Config(format!("{} must be a whole number of seconds, got '{}': {}", key, value, e))),
    }
}
