// src/sources/mod.rs
//! Ways of obtaining the nisab value. Each source pairs one acquisition method
//! with one marker set and reports failures tagged with its own kind.

pub mod client;
pub mod direct;
pub mod rendered;
pub mod search;

use std::fmt;

use async_trait::async_trait;

use crate::extractors::NisabValue;
use crate::utils::error::StrategyError;

pub use direct::DirectPageSource;
pub use rendered::RenderedPageSource;
pub use search::SearchEngineSource;

/// Canonical page publishing the current nisab value.
pub const NISAB_SOURCE_URL: &str = "https://www.zakat.sg/current-past-nisab-values/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Direct,
    SearchEngine,
    Rendered,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Direct => "direct-fetch",
            StrategyKind::SearchEngine => "search-engine",
            StrategyKind::Rendered => "rendered-browser",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text obtained by one acquisition method, tagged with who produced it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub strategy: StrategyKind,
    pub body: String,
}

impl RawDocument {
    pub fn new(strategy: StrategyKind, body: impl Into<String>) -> Self {
        Self {
            strategy,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait NisabSource: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Makes exactly one attempt. No retries.
    async fn fetch_nisab(&self) -> Result<NisabValue, StrategyError>;
}
