//! Scrape-session orchestration: navigate, wait, expand, extract.

use crate::config::Config;
use crate::laworks::extractor::Extractor;
use crate::laworks::loader;
use crate::laworks::models::Opportunity;
use crate::laworks::session::{wait_for_row_growth, SearchPage};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Drives a full single-page scrape session over a [`SearchPage`].
pub struct Harvester {
    config: Config,
}

impl Harvester {
    /// Creates a new harvester.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Navigates to the search page and extracts all opportunities.
    ///
    /// Per-row extraction failures are logged and skipped; a page that never
    /// attaches a row within the load timeout is fatal. An interrupt via
    /// `cancel` returns whatever was extracted so far.
    pub async fn harvest(
        &self,
        page: &dyn SearchPage,
        cancel: &AtomicBool,
    ) -> Result<Vec<Opportunity>> {
        info!("Navigating to {}", self.config.search_url);
        page.open(&self.config.search_url).await?;

        info!("Waiting for results table to render...");
        let timeout = Duration::from_millis(self.config.page_load_timeout_ms);
        if !wait_for_row_growth(page, 0, timeout).await? {
            anyhow::bail!(
                "No result rows attached within {}ms; page layout may have changed",
                self.config.page_load_timeout_ms
            );
        }

        // The attachment signal fires before client-side rendering finishes
        sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let report = loader::load_all(page, &self.config, cancel).await?;
        info!("Total rows loaded: {} ({:?})", report.rows, report.outcome);

        self.extract_all_rows(page, cancel).await
    }

    /// Extracts records from every currently-present row, skipping failures.
    async fn extract_all_rows(
        &self,
        page: &dyn SearchPage,
        cancel: &AtomicBool,
    ) -> Result<Vec<Opportunity>> {
        let extractor = Extractor::new(self.config.base_url.clone());
        let count = page.row_count().await?;
        info!("Extracting data from {} rows...", count);

        let mut opportunities = Vec::with_capacity(count);
        for i in 0..count {
            if cancel.load(Ordering::Relaxed) {
                warn!("Interrupted; returning {} records extracted so far", opportunities.len());
                break;
            }

            let html = match page.row_html(i).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Failed to read row {}: {}", i, e);
                    continue;
                }
            };

            match extractor.extract_row(&html) {
                Ok(opp) => opportunities.push(opp),
                Err(e) => warn!("Failed to extract row {}: {}", i, e),
            }
        }

        info!("Successfully extracted {} opportunities.", opportunities.len());
        Ok(opportunities)
    }
}
