//! Data models for scraped volunteer opportunities.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing category, derived from marker classes on the opportunity link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpportunityType {
    #[default]
    #[serde(rename = "Volunteer Opportunity")]
    VolunteerOpportunity,
    #[serde(rename = "Special Event")]
    SpecialEvent,
    #[serde(rename = "Already Filled")]
    AlreadyFilled,
    #[serde(rename = "Training")]
    Training,
}

/// Marker classes on the opportunity `<a>` tag, checked in priority order.
const TYPE_MARKERS: [(&str, OpportunityType); 4] = [
    ("blue-key", OpportunityType::VolunteerOpportunity),
    ("green-key", OpportunityType::SpecialEvent),
    ("light-gray-key", OpportunityType::AlreadyFilled),
    ("yellow-key", OpportunityType::Training),
];

impl OpportunityType {
    /// Maps a link's class attribute to a type. Unmatched classes fall back
    /// to the default; this never fails.
    pub fn from_class_attr(class_attr: &str) -> Self {
        for (marker, kind) in TYPE_MARKERS {
            if class_attr.contains(marker) {
                return kind;
            }
        }
        OpportunityType::default()
    }

    /// Returns all types in display order.
    pub fn all() -> &'static [OpportunityType] {
        &[
            OpportunityType::VolunteerOpportunity,
            OpportunityType::SpecialEvent,
            OpportunityType::AlreadyFilled,
            OpportunityType::Training,
        ]
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpportunityType::VolunteerOpportunity => "Volunteer Opportunity",
            OpportunityType::SpecialEvent => "Special Event",
            OpportunityType::AlreadyFilled => "Already Filled",
            OpportunityType::Training => "Training",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OpportunityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Volunteer Opportunity" => Ok(OpportunityType::VolunteerOpportunity),
            "Special Event" => Ok(OpportunityType::SpecialEvent),
            "Already Filled" => Ok(OpportunityType::AlreadyFilled),
            "Training" => Ok(OpportunityType::Training),
            _ => Err(format!("Unknown opportunity type: {}", s)),
        }
    }
}

/// A volunteer opportunity from the search results.
///
/// Created once per row during extraction and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    /// Listing title (never empty after successful extraction)
    pub title: String,
    /// Hosting organization (never empty after successful extraction)
    pub organization: String,
    /// Free-text location, e.g. "123 Main St, Los Angeles, CA 90065"
    pub location: String,
    /// Display date, or the sentinel "Ongoing"
    pub date: Option<String>,
    /// Display time
    pub time: Option<String>,
    /// Display duration
    pub duration: Option<String>,
    /// Machine-sortable timestamp from the Time cell's data-order attribute,
    /// kept verbatim
    pub datetime_iso: Option<String>,
    /// Distance column text
    pub distance: Option<String>,
    /// Listing category
    pub opportunity_type: OpportunityType,
    /// Absolute listing URL
    pub opportunity_url: Option<String>,
    /// Salesforce ID from the listing URL path
    pub opportunity_id: Option<String>,
    /// Absolute organization URL
    pub organization_url: Option<String>,
    /// ISO-8601 extraction timestamp
    pub scraped_at: String,
}

impl Opportunity {
    /// Current time in the format used for `scraped_at`.
    pub fn capture_timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
