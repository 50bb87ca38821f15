//! CSS selectors for the LA Works search results table.
//!
//! Selectors were discovered from the live DOM. Update this file when the
//! site changes its table structure.

use scraper::Selector;
use std::sync::LazyLock;

/// Result rows in the live document (used through the WebDriver session).
pub static RESULT_ROW_CSS: &str = "table#datatable-search-opportunities-block tbody tr";

/// "Load more opportunities" control in the live document.
pub static LOAD_MORE_CSS: &str = "a.view-more-link";

/// Per-row cells, keyed by their `data-th` attribute.
pub static CELL_OPPORTUNITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[data-th='Opportunity']").unwrap());

pub static CELL_ORGANIZATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[data-th='Organization']").unwrap());

pub static CELL_WHERE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[data-th='Where']").unwrap());

pub static CELL_TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[data-th='Time']").unwrap());

pub static CELL_DISTANCE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[data-th='Distance']").unwrap());

/// Link inside the opportunity/organization cells.
pub static CELL_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Optional sub-elements of the Time cell.
pub static DATE_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".date-row").unwrap());

pub static TIME_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".time-row").unwrap());

pub static DURATION: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".duration").unwrap());
