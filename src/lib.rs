//! vol-crawler - Volunteer opportunity scraper and map builder for LA Works
//!
//! Drives the volunteer.laworks.com search results table through a WebDriver
//! session, extracts structured opportunity records, and joins zip-aggregated
//! counts onto CA boundary polygons for a static choropleth map.

pub mod commands;
pub mod config;
pub mod geo;
pub mod laworks;
pub mod render;

pub use config::Config;
pub use laworks::models::{Opportunity, OpportunityType};
