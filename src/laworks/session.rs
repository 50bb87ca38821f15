//! Browser session behind a narrow capability interface.
//!
//! The loader and harvester only see [`SearchPage`], so tests drive them
//! with scripted in-memory pages and the WebDriver backend stays swappable.

use crate::config::Config;
use crate::laworks::selectors;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thirtyfour::{By, DesiredCapabilities, WebDriver};
use tokio::time::sleep;
use tracing::debug;

/// Poll step for row-count condition waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Capability interface over the live search results page.
#[async_trait]
pub trait SearchPage: Send + Sync {
    /// Navigates to the given URL.
    async fn open(&self, url: &str) -> Result<()>;

    /// Number of result rows currently attached to the document.
    async fn row_count(&self) -> Result<usize>;

    /// Outer HTML of the row at `index`.
    async fn row_html(&self, index: usize) -> Result<String>;

    /// True if the "load more" control is present and interactable.
    async fn load_more_visible(&self) -> Result<bool>;

    /// Brings the "load more" control into view and activates it.
    async fn click_load_more(&self) -> Result<()>;
}

/// Bounded poll until the row count exceeds `above`. Returns false on
/// timeout; polling errors propagate.
pub async fn wait_for_row_growth(
    page: &dyn SearchPage,
    above: usize,
    timeout: Duration,
) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.row_count().await? > above {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        sleep(POLL_INTERVAL.min(timeout)).await;
    }
}

/// Live results page driven through chromedriver.
pub struct BrowserPage {
    driver: WebDriver,
}

impl BrowserPage {
    /// Connects to the WebDriver endpoint and opens a browser window.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_chrome_arg("--headless")?;
        }
        caps.add_chrome_arg("--no-sandbox")?;
        caps.add_chrome_arg("--disable-dev-shm-usage")?;
        caps.add_chrome_arg("--disable-gpu")?;
        caps.add_chrome_arg("--window-size=1280,720")?;
        caps.add_chrome_arg("--disable-blink-features=AutomationControlled")?;

        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .with_context(|| format!("Failed to connect to WebDriver at {}", config.webdriver_url))?;

        driver
            .set_page_load_timeout(Duration::from_millis(config.page_load_timeout_ms))
            .await?;

        Ok(Self { driver })
    }

    /// Closes the browser session.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await.context("Failed to close browser session")
    }
}

#[async_trait]
impl SearchPage for BrowserPage {
    async fn open(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.driver.goto(url).await.with_context(|| format!("Navigation to {} failed", url))
    }

    async fn row_count(&self) -> Result<usize> {
        let rows = self.driver.find_all(By::Css(selectors::RESULT_ROW_CSS)).await?;
        Ok(rows.len())
    }

    async fn row_html(&self, index: usize) -> Result<String> {
        let rows = self.driver.find_all(By::Css(selectors::RESULT_ROW_CSS)).await?;
        let row = rows
            .get(index)
            .with_context(|| format!("Result row {} detached from document", index))?;
        row.outer_html().await.context("Failed to read row HTML")
    }

    async fn load_more_visible(&self) -> Result<bool> {
        match self.driver.find(By::Css(selectors::LOAD_MORE_CSS)).await {
            Ok(control) => Ok(control.is_displayed().await.unwrap_or(false)),
            Err(_) => Ok(false),
        }
    }

    async fn click_load_more(&self) -> Result<()> {
        let control = self
            .driver
            .find(By::Css(selectors::LOAD_MORE_CSS))
            .await
            .context("'Load more' control disappeared before click")?;
        control.scroll_into_view().await?;
        control.click().await.context("Failed to click 'load more'")
    }
}
