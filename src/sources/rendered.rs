// src/sources/rendered.rs
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;

use crate::extractors::{normalize, NisabValue};
use crate::sources::{NisabSource, StrategyKind, NISAB_SOURCE_URL};
use crate::utils::config::AppConfig;
use crate::utils::error::{ExtractError, FetchError, StrategyError};

// --- Constants ---
const HEADING_CSS: &str = "h2";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-extensions",
    "--disable-blink-features=AutomationControlled",
    "--no-first-run",
    "--window-size=1920,1080",
];

/// One headless Chrome process plus the task pumping its CDP events.
///
/// Call [`BrowserSession::close`] on every path. Dropping an unclosed session
/// stops the event task and lets chromiumoxide kill the child process.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    closed: bool,
}

impl BrowserSession {
    async fn launch(executable: Option<&Path>) -> Result<Self, FetchError> {
        let mut builder = BrowserConfig::builder().args(LAUNCH_ARGS.iter().copied());
        if let Some(path) = executable {
            tracing::debug!("Using Chrome executable override: {}", path.display());
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| FetchError::Browser(format!("Browser config error: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(format!("Failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        tracing::debug!("Headless browser launched");

        Ok(Self {
            browser,
            handler,
            closed: false,
        })
    }

    async fn open(&self, url: &str) -> Result<Page, FetchError> {
        self.browser
            .new_page(url)
            .await
            .map_err(|e| FetchError::Browser(format!("Failed to open {}: {}", url, e)))
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }
        self.handler.abort();
        self.closed = true;
        tracing::debug!("Headless browser released");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("Browser session dropped without close, aborting its handler");
            self.handler.abort();
        }
    }
}

/// Renders the source page in headless Chrome and reads the heading from the DOM.
pub struct RenderedPageSource {
    url: String,
    chrome_executable: Option<PathBuf>,
    wait: Duration,
}

impl RenderedPageSource {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            url: NISAB_SOURCE_URL.to_string(),
            chrome_executable: config.chrome_executable.clone(),
            wait: config.render_wait,
        }
    }

    async fn read_heading(&self, session: &BrowserSession) -> Result<NisabValue, StrategyError> {
        let page = session
            .open(&self.url)
            .await
            .map_err(|e| StrategyError::fetch(self.kind(), e))?;

        let result = self.snapshot_heading(&page).await;

        if let Err(e) = page.close().await {
            tracing::warn!("[{}] Failed to close page: {}", self.kind(), e);
        }
        result
    }

    async fn snapshot_heading(&self, page: &Page) -> Result<NisabValue, StrategyError> {
        let heading = self.await_heading(|| page.find_element(HEADING_CSS)).await?;

        let text = heading.inner_text().await.map_err(|e| {
            StrategyError::fetch(self.kind(), FetchError::Browser(format!("Failed to read `{}` text: {}", HEADING_CSS, e)))
        })?;
        tracing::debug!("[{}] `{}` text: {:?}", self.kind(), HEADING_CSS, text);

        Ok(heading_value(text.as_deref())?)
    }

    /// Polls `find` until it yields the heading, or reports a timeout after `self.wait`.
    async fn await_heading<T, E, F, Fut>(&self, find: F) -> Result<T, StrategyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        wait_for(self.wait, POLL_INTERVAL, find)
            .await
            .map_err(|_| StrategyError::Timeout {
                strategy: self.kind(),
                selector: HEADING_CSS,
                waited: self.wait,
            })
    }
}

/// Calls `find` every `poll` until it succeeds. Gives up once `wait` has elapsed.
async fn wait_for<T, E, F, Fut>(wait: Duration, poll: Duration, mut find: F) -> Result<T, Elapsed>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    tokio::time::timeout(wait, async {
        loop {
            match find().await {
                Ok(found) => return found,
                Err(e) => {
                    tracing::trace!("`{}` not rendered yet: {}", HEADING_CSS, e);
                    tokio::time::sleep(poll).await;
                }
            }
        }
    })
    .await
}

/// Heading text read from the live DOM, normalized like the marker extractor.
fn heading_value(text: Option<&str>) -> Result<NisabValue, ExtractError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ExtractError::format_changed(
            StrategyKind::Rendered,
            format!("first `{}` element has no text", HEADING_CSS),
        ));
    }
    Ok(normalize(text))
}

#[async_trait]
impl NisabSource for RenderedPageSource {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Rendered
    }

    async fn fetch_nisab(&self) -> Result<NisabValue, StrategyError> {
        tracing::info!("[{}] Rendering {} in headless browser", self.kind(), self.url);
        let session = BrowserSession::launch(self.chrome_executable.as_deref())
            .await
            .map_err(|e| StrategyError::fetch(self.kind(), e))?;

        let result = self.read_heading(&session).await;
        session.close().await;
        result
    }
}
