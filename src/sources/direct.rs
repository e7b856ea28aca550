// src/sources/direct.rs
use async_trait::async_trait;

use crate::extractors::{extract, ExtractionSpec, NisabValue};
use crate::sources::client::fetch_document;
use crate::sources::{NisabSource, StrategyKind, NISAB_SOURCE_URL};
use crate::utils::error::StrategyError;

/// The value is the text of the page's first `<h2>`.
pub const PAGE_HEADING: ExtractionSpec = ExtractionSpec {
    name: "page heading",
    open: "<h2",
    close: "</h2>",
};

/// Plain GET of the source page.
///
/// Kept for manual runs. The site started rejecting non-browser traffic, so it is
/// not part of the default chain.
pub struct DirectPageSource {
    client: reqwest::Client,
    url: String,
}

impl DirectPageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(client, NISAB_SOURCE_URL)
    }

    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl NisabSource for DirectPageSource {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Direct
    }

    async fn fetch_nisab(&self) -> Result<NisabValue, StrategyError> {
        let document = fetch_document(&self.client, self.kind(), &self.url, &[])
            .await
            .map_err(|e| StrategyError::fetch(self.kind(), e))?;
        Ok(extract(&document, &PAGE_HEADING)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::client::build_browser_client;
    use crate::sources::RawDocument;
    use crate::utils::config::AppConfig;
    use crate::utils::error::FetchError;

    fn http() -> reqwest::Client {
        build_browser_client(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_page_heading_spec_matches_published_layout() {
        let html = r#"
            <div class="elementor-widget-container">
                <h2 class="elementor-heading-title elementor-size-default">$7,500</h2>
            </div>
            <h2 class="elementor-heading-title">Past Nisab Values</h2>
        "#;
        let value = extract(&RawDocument::new(StrategyKind::Direct, html), &PAGE_HEADING).unwrap();
        assert_eq!(value.as_str(), "7500");
    }

    #[tokio::test]
    async fn test_rejected_request_fails_without_retry() {
        for status in [403, 500] {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("GET", "/current-past-nisab-values/")
                .with_status(status)
                .with_body("<html>Access denied</html>")
                .expect(1)
                .create_async()
                .await;

            let source = DirectPageSource::with_url(http(), format!("{}/current-past-nisab-values/", server.url()));
            let err = source.fetch_nisab().await.unwrap_err();

            match err {
                StrategyError::Fetch { strategy, source: FetchError::Http(code) } => {
                    assert_eq!(strategy, StrategyKind::Direct);
                    assert_eq!(code.as_u16(), status as u16);
                }
                other => panic!("expected HTTP fetch error, got {:?}", other),
            }
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_fetches_page_with_browser_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/current-past-nisab-values/")
            .match_header("user-agent", mockito::Matcher::Regex("Chrome/".to_string()))
            .match_header("sec-fetch-mode", "navigate")
            .with_status(200)
            .with_body(r#"<h2 class="elementor-heading-title">$7,500</h2>"#)
            .expect(1)
            .create_async()
            .await;

        let source = DirectPageSource::with_url(http(), format!("{}/current-past-nisab-values/", server.url()));
        let value = source.fetch_nisab().await.unwrap();

        assert_eq!(value.as_str(), "7500");
        mock.assert_async().await;
    }
}
