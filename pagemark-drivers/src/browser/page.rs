use anyhow::{anyhow, Result};
use fantoccini::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An open page in a WebDriver session.
pub struct BrowserPage {
    pub(crate) client: Client,
}

impl BrowserPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate to `url` and wait until the document has been parsed.
    pub async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        self.client.goto(url).await.map_err(anyhow::Error::from)?;
        self.wait_for_dom_ready(timeout).await
    }

    /// Poll `document.readyState` until it is `interactive` or `complete`.
    async fn wait_for_dom_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self
                .client
                .execute("return document.readyState;", vec![])
                .await?;
            let state = state.as_str().unwrap_or_default();
            if matches!(state, "interactive" | "complete") {
                debug!(ready_state = state, "browser.page.ready");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(anyhow!("page did not become ready within {:?}", timeout));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Return the full page HTML source.
    pub async fn content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::msg)
    }

    /// Return the page title.
    pub async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(anyhow::Error::msg)
    }

    /// Return the current page URL.
    pub async fn url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::msg)
    }
}
