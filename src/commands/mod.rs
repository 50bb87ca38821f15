//! CLI command implementations.

pub mod map;
pub mod scrape;

pub use map::MapCommand;
pub use scrape::ScrapeCommand;
