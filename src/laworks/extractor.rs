//! Row extractor for the search results table.
//!
//! Parses the HTML fragment of one `<tr>` into an [`Opportunity`]. The
//! fragment is read off the live page by the harvester; parsing is plain
//! HTML, so no browser is involved here.

use crate::laworks::models::{Opportunity, OpportunityType};
use crate::laworks::selectors;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use thiserror::Error;

/// Salesforce ID in a URL like /opportunity/a0CQg00009Z8TdkMAF.
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/opportunity/([a-zA-Z0-9]+)").unwrap());

/// A required lookup failed for this row. The harvester catches these,
/// skips the row, and continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing {0} in result row")]
    Missing(&'static str),
}

/// Parses single result rows into typed records.
pub struct Extractor {
    base_url: String,
}

impl Extractor {
    /// Creates an extractor resolving root-relative links against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Extracts exactly one record from a row's HTML fragment.
    pub fn extract_row(&self, row_html: &str) -> Result<Opportunity, ExtractError> {
        // A bare <tr> fragment gets its cells hoisted out of the tree by the
        // HTML5 parser, so re-wrap it in table context first.
        let wrapped = format!("<table><tbody>{}</tbody></table>", row_html);
        let fragment = Html::parse_fragment(&wrapped);
        let root = fragment.root_element();

        // Opportunity title and link
        let opp_cell = root
            .select(&selectors::CELL_OPPORTUNITY)
            .next()
            .ok_or(ExtractError::Missing("opportunity cell"))?;
        let opp_link = opp_cell
            .select(&selectors::CELL_LINK)
            .next()
            .ok_or(ExtractError::Missing("opportunity link"))?;

        let title = element_text(opp_link);
        if title.is_empty() {
            return Err(ExtractError::Missing("opportunity title"));
        }

        let href = opp_link.value().attr("href");
        let opportunity_url = href.map(|h| self.resolve_url(h));
        let opportunity_id = href.and_then(extract_id_from_href);

        // Opportunity type from link class; unmatched classes use the default
        let class_attr = opp_link.value().attr("class").unwrap_or("");
        let opportunity_type = OpportunityType::from_class_attr(class_attr);

        // Organization
        let org_cell = root
            .select(&selectors::CELL_ORGANIZATION)
            .next()
            .ok_or(ExtractError::Missing("organization cell"))?;
        let org_link = org_cell
            .select(&selectors::CELL_LINK)
            .next()
            .ok_or(ExtractError::Missing("organization link"))?;

        let organization = element_text(org_link);
        if organization.is_empty() {
            return Err(ExtractError::Missing("organization name"));
        }
        let organization_url = org_link.value().attr("href").map(|h| self.resolve_url(h));

        // Location
        let location = root
            .select(&selectors::CELL_WHERE)
            .next()
            .map(element_text)
            .unwrap_or_default();

        // Date/Time: data-order is kept verbatim, sub-elements are each optional
        let time_cell = root.select(&selectors::CELL_TIME).next();
        let datetime_iso = time_cell
            .and_then(|cell| cell.value().attr("data-order"))
            .map(str::to_string);

        let mut date = time_cell
            .and_then(|cell| cell.select(&selectors::DATE_ROW).next())
            .map(element_text);
        let time = time_cell
            .and_then(|cell| cell.select(&selectors::TIME_ROW).next())
            .map(element_text);
        let duration = time_cell
            .and_then(|cell| cell.select(&selectors::DURATION).next())
            .map(element_text);

        // No date span usually means an open-ended listing
        if date.is_none() {
            if let Some(cell) = time_cell {
                if element_text(cell).to_lowercase().contains("ongoing") {
                    date = Some("Ongoing".to_string());
                }
            }
        }

        // Distance
        let distance = root.select(&selectors::CELL_DISTANCE).next().map(element_text);

        Ok(Opportunity {
            title,
            organization,
            location,
            date,
            time,
            duration,
            datetime_iso,
            distance,
            opportunity_type,
            opportunity_url,
            opportunity_id,
            organization_url,
            scraped_at: Opportunity::capture_timestamp(),
        })
    }

    /// Resolves root-relative hrefs against the base origin; external URLs
    /// pass through unmodified.
    fn resolve_url(&self, href: &str) -> String {
        if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            href.to_string()
        }
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Extracts the Salesforce ID from an opportunity href, if present.
fn extract_id_from_href(href: &str) -> Option<String> {
    ID_RE.captures(href).map(|caps| caps[1].to_string())
}
