//! Headless Chromium page fetcher.
//!
//! Only used as a fallback behind the plain HTTP client for directories that
//! render their listings with JavaScript. Requires the `browser` feature.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig as CdpConfig};
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::http_client::{FetchError, PageFetcher};

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/opt/google/chrome/google-chrome",
];

const CHROME_BINARIES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

fn browser_error(e: impl std::fmt::Display) -> FetchError {
    FetchError::Browser(e.to_string())
}

/// Renders pages in a lazily launched headless browser.
pub struct BrowserFetcher {
    config: BrowserConfig,
    user_agent: String,
    browser: Mutex<Option<Browser>>,
}

impl BrowserFetcher {
    pub fn new(config: BrowserConfig, user_agent: impl Into<String>) -> Self {
        Self {
            config,
            user_agent: user_agent.into(),
            browser: Mutex::new(None),
        }
    }

    fn find_chrome(&self) -> Result<PathBuf, FetchError> {
        if let Some(path) = &self.config.chrome_path {
            return Ok(path.clone());
        }

        if let Some(path) = CHROME_PATHS.iter().map(Path::new).find(|p| p.exists()) {
            info!("Found Chrome at: {}", path.display());
            return Ok(path.to_path_buf());
        }

        let in_path = std::env::var_os("PATH").and_then(|paths| {
            std::env::split_paths(&paths)
                .flat_map(|dir| CHROME_BINARIES.iter().map(move |bin| dir.join(bin)))
                .find(|candidate| candidate.exists())
        });
        in_path.ok_or_else(|| {
            FetchError::Browser(
                "Chrome/Chromium not found; install it or set browser.chrome_path".to_string(),
            )
        })
    }

    async fn launch(&self) -> Result<Browser, FetchError> {
        info!("Launching browser (headless={})", self.config.headless);

        let mut builder = CdpConfig::builder().chrome_executable(self.find_chrome()?);
        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }
        let config = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .build()
            .map_err(browser_error)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });
        Ok(browser)
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<String, FetchError> {
        let page = browser.new_page("about:blank").await.map_err(browser_error)?;
        page.execute(SetUserAgentOverrideParams::new(self.user_agent.clone()))
            .await
            .map_err(browser_error)?;

        let timeout = Duration::from_secs(self.config.timeout);
        let loaded = tokio::time::timeout(timeout, async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            page.content().await
        })
        .await;
        let _ = page.close().await;

        match loaded {
            Ok(result) => result.map_err(browser_error),
            Err(_) => Err(FetchError::Browser(format!(
                "Timed out after {}s loading {}",
                self.config.timeout, url
            ))),
        }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut guard = self.browser.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch().await?);
        }
        let browser = guard
            .as_ref()
            .ok_or_else(|| FetchError::Browser("browser not running".to_string()))?;

        debug!("Rendering {} in browser", url);
        self.render(browser, url).await
    }
}
