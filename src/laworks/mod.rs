//! LA Works-specific modules for the browser session, row parsing, and models.

pub mod extractor;
pub mod harvester;
pub mod loader;
pub mod models;
pub mod selectors;
pub mod session;

pub use extractor::Extractor;
pub use harvester::Harvester;
pub use loader::{LoadOutcome, LoadReport};
pub use models::{Opportunity, OpportunityType};
pub use session::{BrowserPage, SearchPage};
