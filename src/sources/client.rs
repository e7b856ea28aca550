// src/sources/client.rs
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::sources::{RawDocument, StrategyKind};
use crate::utils::config::AppConfig;
use crate::utils::error::FetchError;

// A current desktop Chrome on Windows. The source site rejects requests without these.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
    ("accept-language", "en-US,en;q=0.9"),
    ("cache-control", "no-cache"),
    ("pragma", "no-cache"),
    ("sec-ch-ua", "\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

/// Header set sent with every scraping request.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len() + 1);
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

/// Creates a reqwest client that looks like a desktop browser.
pub fn build_browser_client(config: &AppConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .default_headers(browser_headers())
        .timeout(config.http_timeout)
        .build()
}

/// Issues one GET and returns the body. Non-2xx is an error; there is no retry.
pub async fn fetch_document(
    client: &reqwest::Client,
    strategy: StrategyKind,
    url: &str,
    query: &[(&str, &str)],
) -> Result<RawDocument, FetchError> {
    tracing::info!("[{}] Downloading document from: {}", strategy, url);

    let mut request = client.get(url);
    if !query.is_empty() {
        request = request.query(query);
    }
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("[{}] HTTP error status: {} for URL: {}", strategy, status, url);
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("[{}] Received 403 Forbidden - the site is likely rejecting non-browser traffic.", strategy);
        }
        return Err(FetchError::Http(status));
    }

    let body = response.text().await?;
    tracing::debug!("[{}] Downloaded {} bytes from {}", strategy, body.len(), url);

    Ok(RawDocument::new(strategy, body))
}
