use crate::browser::page::BrowserPage;
use anyhow::{Context, Result};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder};
use pagemark_config::BrowserSettings;
use serde_json::json;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

const BASE_CHROME_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--no-sandbox",
    "--window-size=1366,900",
];

/// Chrome arguments for a session with the given settings.
pub fn chrome_arguments(settings: &BrowserSettings) -> Vec<String> {
    let mut args: Vec<String> = BASE_CHROME_ARGS.iter().map(|a| a.to_string()).collect();
    if settings.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct BrowserDriver {
    client: Client,
    page_load_timeout: Duration,
}

impl BrowserDriver {
    /// Open a session on the WebDriver service named in `settings`
    /// (Chromedriver at `http://localhost:9515` by default).
    pub async fn connect(settings: &BrowserSettings) -> Result<Self> {
        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": chrome_arguments(settings) }),
        );
        // Return once DOMContentLoaded fires rather than waiting on every subresource.
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&settings.webdriver_url)
            .await
            .with_context(|| format!("failed to connect to WebDriver at {}", settings.webdriver_url))?;

        let page_load_timeout = Duration::from_secs(settings.page_load_timeout_secs);
        client
            .update_timeouts(TimeoutConfiguration::new(None, Some(page_load_timeout), None))
            .await
            .context("failed to set page load timeout")?;

        Ok(Self {
            client,
            page_load_timeout,
        })
    }

    /// Navigate to `url` and return a [`BrowserPage`] once the DOM is ready.
    pub async fn goto(&mut self, url: &str) -> Result<BrowserPage> {
        let page = BrowserPage::new(self.client.clone());
        page.goto(url, self.page_load_timeout).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
