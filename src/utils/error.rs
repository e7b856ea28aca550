// src/utils/error.rs
use std::time::Duration;
use thiserror::Error;

use crate::sources::StrategyKind;

/// Failures while acquiring a raw document (network, HTTP status, browser).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 403 Forbidden from anti-bot protection

    #[error("Headless browser error: {0}")]
    Browser(String),
}

/// The markup no longer matches the markers a strategy expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("[{strategy}] {reason}: {raw_cause}")]
    FormatChanged {
        strategy: StrategyKind,
        reason: &'static str,
        raw_cause: String,
    },
}

impl ExtractError {
    pub fn format_changed(strategy: StrategyKind, raw_cause: impl Into<String>) -> Self {
        ExtractError::FormatChanged {
            strategy,
            reason: "format changed",
            raw_cause: raw_cause.into(),
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        match self {
            ExtractError::FormatChanged { strategy, .. } => *strategy,
        }
    }
}

/// A single strategy attempt that did not produce a value.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("[{strategy}] fetch failed, the page may be blocking scrapers or its markup changed: {source}")]
    Fetch {
        strategy: StrategyKind,
        #[source]
        source: FetchError,
    },

    #[error("extraction failed, the page markup likely changed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("[{strategy}] timed out after {waited:?} waiting for `{selector}`, the page layout likely changed")]
    Timeout {
        strategy: StrategyKind,
        selector: &'static str,
        waited: Duration,
    },
}

impl StrategyError {
    pub fn fetch(strategy: StrategyKind, source: impl Into<FetchError>) -> Self {
        StrategyError::Fetch {
            strategy,
            source: source.into(),
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        match self {
            StrategyError::Fetch { strategy, .. } => *strategy,
            StrategyError::Extraction(e) => e.strategy(),
            StrategyError::Timeout { strategy, .. } => *strategy,
        }
    }
}

/// Raised by the fallback chain once every strategy has been tried.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("All {} nisab strategies failed: {}", .failures.len(), summarize(.failures))]
    AllStrategiesFailed { failures: Vec<StrategyError> },
}

fn summarize(failures: &[StrategyError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Closed set of alert delivery failures, each with a stable numeric code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    #[error("Unknown notifier error: {description}")]
    Unknown { description: String },

    #[error("Bot token is missing or was rejected")]
    MissingCredential,

    #[error("Message to edit was not found")]
    MessageNotFound,

    #[error("Message was already deleted or edited")]
    MessageAlreadyGone,

    #[error("Message cannot be edited")]
    EditNotPermitted,

    #[error("Destination chat id is missing")]
    MissingChatId,

    #[error("Message content is unchanged, edit rejected")]
    MessageNotModified,

    #[error("Bot was blocked by the recipient")]
    BlockedByUser,
}

impl NotifierError {
    pub fn code(&self) -> u8 {
        match self {
            NotifierError::Unknown { .. } => 0,
            NotifierError::MissingCredential => 1,
            NotifierError::MessageNotFound => 2,
            NotifierError::MessageAlreadyGone => 3,
            NotifierError::EditNotPermitted => 4,
            NotifierError::MissingChatId => 5,
            NotifierError::MessageNotModified => 6,
            NotifierError::BlockedByUser => 7,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET request has no query parameters")]
    MissingQuery,

    #[error("Invalid request event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("Nisab lookup failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Strategy failed: {0}")]
    Strategy(#[from] StrategyError),
}
