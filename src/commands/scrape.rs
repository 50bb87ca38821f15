//! Scrape command: run a browser session, harvest all opportunities, and
//! persist them as JSON and CSV.

use crate::config::Config;
use crate::laworks::models::Opportunity;
use crate::laworks::session::BrowserPage;
use crate::laworks::Harvester;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Executes a full scrape session.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the session and saves results. Ctrl-C during harvesting still
    /// saves whatever was extracted up to that point.
    pub async fn execute(&self) -> Result<()> {
        let cancel = Arc::new(AtomicBool::new(false));
        {
            let cancel = Arc::clone(&cancel);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received. Finishing current row, then saving...");
                    cancel.store(true, Ordering::Relaxed);
                }
            });
        }

        let page = BrowserPage::connect(&self.config)
            .await
            .context("Failed to start browser session (is chromedriver running?)")?;

        let harvester = Harvester::new(self.config.clone());
        let harvested = harvester.harvest(&page, &cancel).await;

        // Close the browser before surfacing any harvest error
        if let Err(e) = page.quit().await {
            warn!("Failed to close browser session: {}", e);
        }
        let opportunities = harvested?;

        if opportunities.is_empty() {
            warn!("No opportunities found!");
            return Ok(());
        }

        let (json_path, csv_path) = save_results(&self.config.output_dir, &opportunities)?;

        println!("\n{}", "=".repeat(60));
        println!("Scraped {} volunteer opportunities", opportunities.len());
        println!("{}", "=".repeat(60));
        println!("  JSON: {}", json_path.display());
        println!("  CSV:  {}", csv_path.display());

        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        for opp in &opportunities {
            *by_type.entry(opp.opportunity_type.to_string()).or_default() += 1;
        }
        println!("\nBy type:");
        for (kind, count) in &by_type {
            println!("  {}: {}", kind, count);
        }

        let orgs: HashSet<&str> = opportunities.iter().map(|o| o.organization.as_str()).collect();
        println!("\nUnique organizations: {}", orgs.len());
        println!("{}", "=".repeat(60));

        Ok(())
    }
}

/// Saves the record set to `opportunities.json` and `opportunities.csv`
/// under `output_dir`, creating it as needed.
pub fn save_results(
    output_dir: &Path,
    opportunities: &[Opportunity],
) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;

    let json_path = output_dir.join("opportunities.json");
    let json = serde_json::to_string_pretty(opportunities)?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    info!("Saved JSON: {} ({} records)", json_path.display(), opportunities.len());

    let csv_path = output_dir.join("opportunities.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to write {}", csv_path.display()))?;
    for opp in opportunities {
        writer.serialize(opp)?;
    }
    writer.flush()?;
    info!("Saved CSV: {} ({} records)", csv_path.display(), opportunities.len());

    Ok((json_path, csv_path))
}
