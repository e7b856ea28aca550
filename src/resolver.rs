// src/resolver.rs
use crate::extractors::NisabValue;
use crate::sources::{NisabSource, RenderedPageSource, SearchEngineSource};
use crate::utils::config::AppConfig;
use crate::utils::error::ResolveError;

/// Ordered list of sources tried one after another until one yields a value.
pub struct FallbackChain {
    sources: Vec<Box<dyn NisabSource>>,
}

impl FallbackChain {
    pub fn new(sources: Vec<Box<dyn NisabSource>>) -> Self {
        Self { sources }
    }

    /// Search-engine snippet first, rendered source page last.
    /// `http` should come from [`crate::sources::client::build_browser_client`].
    pub fn standard(config: &AppConfig, http: reqwest::Client) -> Self {
        Self::new(vec![
            Box::new(SearchEngineSource::new(http)),
            Box::new(RenderedPageSource::new(config)),
        ])
    }

    /// Tries each source once, in order. Failures before the last success are only logged.
    pub async fn resolve(&self) -> Result<NisabValue, ResolveError> {
        let mut failures = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            tracing::info!("[{}] Attempting nisab lookup", source.kind());
            match source.fetch_nisab().await {
                Ok(value) => {
                    tracing::info!("[{}] Resolved nisab value: {}", source.kind(), value.as_str());
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!("[{}] Falling through: {}", e.strategy(), e);
                    failures.push(e);
                }
            }
        }

        tracing::error!("Every nisab strategy failed ({} attempted)", failures.len());
        Err(ResolveError::AllStrategiesFailed { failures })
    }
}
