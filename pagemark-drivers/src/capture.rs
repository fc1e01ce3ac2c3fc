use anyhow::{Context, Result};
use pagemark_config::BrowserSettings;
use tracing::{info, warn};
use url::Url;

use crate::browser::driver::BrowserDriver;

/// A rendered page as handed to the analysis core.
#[derive(Debug, Clone)]
pub struct PageCapture {
    pub url: Url,
    pub title: String,
    pub html: String,
}

impl PageCapture {
    /// Hex blake3 digest of the captured HTML.
    pub fn html_checksum(&self) -> String {
        blake3::hash(self.html.as_bytes()).to_hex().to_string()
    }
}

#[async_trait::async_trait]
pub trait PageCapturer: Send + Sync {
    async fn capture(&self, url: &Url) -> Result<PageCapture>;
}

/// Capturer that opens a fresh WebDriver session per page.
pub struct WebDriverCapturer {
    settings: BrowserSettings,
}

impl WebDriverCapturer {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl PageCapturer for WebDriverCapturer {
    async fn capture(&self, url: &Url) -> Result<PageCapture> {
        let mut driver = BrowserDriver::connect(&self.settings).await?;

        let result = async {
            let page = driver
                .goto(url.as_str())
                .await
                .with_context(|| format!("failed to load {url}"))?;
            let title = page.title().await?;
            let html = page.content().await?;
            let final_url = page
                .url()
                .await
                .ok()
                .and_then(|raw| Url::parse(&raw).ok())
                .unwrap_or_else(|| url.clone());
            Ok::<_, anyhow::Error>(PageCapture {
                url: final_url,
                title,
                html,
            })
        }
        .await;

        // Always attempt to close the session, even when capture failed.
        if let Err(e) = driver.close().await {
            warn!(error = %e, "capture.close_failed");
        }

        if let Ok(capture) = &result {
            info!(url = %capture.url, title = %capture.title, bytes = capture.html.len(), "capture.loaded");
        }
        result
    }
}
