//! Incremental result loading: expand the paginated table until growth
//! stalls or the click cap is reached.

use crate::config::Config;
use crate::laworks::session::{wait_for_row_growth, SearchPage};
use anyhow::Result;
use rand::RngExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Terminal state of the expansion loop. Both variants are non-error
/// outcomes; the loader never fails under normal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No "load more" control, or a click produced no new rows in time
    FullyLoaded,
    /// Iteration limit hit before the table stopped growing
    CapReached,
}

/// Result of a full expansion run.
#[derive(Debug, Clone, Copy)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    /// Rows attached when the loop ended
    pub rows: usize,
    /// Expansion attempts performed
    pub clicks: usize,
}

/// Clicks "load more" until all results are visible, growth stalls, or the
/// configured cap is exhausted. Checks `cancel` between iterations so an
/// interrupt leaves the page in a usable state.
pub async fn load_all(
    page: &dyn SearchPage,
    config: &Config,
    cancel: &AtomicBool,
) -> Result<LoadReport> {
    let wait = Duration::from_millis(config.load_more_wait_ms);
    let mut clicks = 0;

    for click_num in 1..=config.max_load_more_clicks {
        if cancel.load(Ordering::Relaxed) {
            info!("Interrupted; stopping expansion after {} clicks", clicks);
            break;
        }

        let count_before = page.row_count().await?;

        if !page.load_more_visible().await? {
            info!("No more 'load more' control. All results loaded.");
            return Ok(LoadReport { outcome: LoadOutcome::FullyLoaded, rows: count_before, clicks });
        }

        info!("Click #{}: {} rows loaded, clicking 'load more'...", click_num, count_before);
        page.click_load_more().await?;
        clicks += 1;

        if !wait_for_row_growth(page, count_before, wait).await? {
            info!("No new rows after click #{}. Assuming all loaded.", click_num);
            return Ok(LoadReport {
                outcome: LoadOutcome::FullyLoaded,
                rows: page.row_count().await?,
                clicks,
            });
        }

        delay(config).await;
    }

    let rows = page.row_count().await?;
    let outcome = if clicks >= config.max_load_more_clicks {
        info!("Expansion cap of {} clicks reached at {} rows", config.max_load_more_clicks, rows);
        LoadOutcome::CapReached
    } else {
        LoadOutcome::FullyLoaded
    };
    Ok(LoadReport { outcome, rows, clicks })
}

/// Jittered pause between expansion requests.
async fn delay(config: &Config) {
    if config.delay_ms == 0 {
        return;
    }

    let jitter = if config.delay_jitter_ms > 0 {
        rand::rng().random_range(0..=config.delay_jitter_ms)
    } else {
        0
    };

    let total_delay = config.delay_ms + jitter;
    debug!("Delaying {}ms", total_delay);
    sleep(Duration::from_millis(total_delay)).await;
}
