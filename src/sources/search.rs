// src/sources/search.rs
use async_trait::async_trait;

use crate::extractors::{extract, ExtractionSpec, NisabValue};
use crate::sources::client::fetch_document;
use crate::sources::{NisabSource, StrategyKind};
use crate::utils::error::StrategyError;

const SEARCH_URL: &str = "https://www.google.com/search";
const SEARCH_QUERY: &str = "current nisab value singapore muis";

/// Featured-answer block of the no-JS results page.
pub const ANSWER_SNIPPET: ExtractionSpec = ExtractionSpec {
    name: "search answer snippet",
    open: r#"<div class="BNeawe iBp4i AP7Wnd">"#,
    close: "</div>",
};

/// Reads the value from a search engine's answer snippet instead of the source page.
pub struct SearchEngineSource {
    client: reqwest::Client,
    url: String,
    query: String,
}

impl SearchEngineSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(client, SEARCH_URL)
    }

    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            query: SEARCH_QUERY.to_string(),
        }
    }
}

#[async_trait]
impl NisabSource for SearchEngineSource {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SearchEngine
    }

    async fn fetch_nisab(&self) -> Result<NisabValue, StrategyError> {
        let document = fetch_document(&self.client, self.kind(), &self.url, &[("q", self.query.as_str())])
            .await
            .map_err(|e| StrategyError::fetch(self.kind(), e))?;
        Ok(extract(&document, &ANSWER_SNIPPET)?)
    }
}
