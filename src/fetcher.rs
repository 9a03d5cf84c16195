use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::error::CdpError;
use futures::StreamExt;

use crate::error::{Error, Result};

/// Upper bound on one fetch, navigation and rendering included. A hang
/// inside the browser surfaces as a fetch failure for that identifier.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Settle time after navigation so scripted content can finish rendering.
const RENDER_WAIT: Duration = Duration::from_secs(2);

/// Fetches one URL and returns the rendered page content.
#[async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Headless Chrome wrapper. Launched once per run and closed explicitly
/// so the browser process never outlives the archiver.
pub struct Browser {
    browser: ChromeBrowser,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a headless browser instance and its CDP event handler.
    pub async fn launch() -> anyhow::Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(1920, 1080)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = ChromeBrowser::launch(config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to launch browser: {}", e))?;

        // Handler task must keep running for the browser to work
        let handle = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => continue,
                    None => break,
                }
            }
        });

        Ok(Self { browser, handle })
    }

    async fn fetch_page(&self, url: &str) -> core::result::Result<String, CdpError> {
        let page = self.browser.new_page(url).await?;
        let _ = page.wait_for_navigation().await;
        tokio::time::sleep(RENDER_WAIT).await;

        let html = page.content().await;
        let _ = page.close().await;
        html
    }

    /// Close the browser and stop the handler task.
    pub async fn close(mut self) -> anyhow::Result<()> {
        let closed = self.browser.close().await;
        self.handle.abort();
        closed.map_err(|e| anyhow::anyhow!("Failed to close browser: {}", e))?;
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for Browser {
    async fn fetch(&self, url: &str) -> Result<String> {
        match tokio::time::timeout(FETCH_TIMEOUT, self.fetch_page(url)).await {
            Ok(Ok(html)) => Ok(html),
            Ok(Err(e)) => Err(Error::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("timed out after {}s", FETCH_TIMEOUT.as_secs()),
            }),
        }
    }
}
