//! Zip-code aggregation: partition flat opportunity rows into per-zip
//! buckets and a virtual (no-location) list.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// First standalone 5-digit run in a location string.
static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{5})\b").unwrap());

/// Flat record consumed by the aggregation side, decoupled from the live
/// extraction model. Deserialized from the saved record set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpportunityRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub opportunity_type: Option<String>,
    #[serde(default)]
    pub opportunity_url: Option<String>,
}

/// Total, disjoint partition of a record set: every row lands in exactly
/// one zip bucket or the virtual list.
#[derive(Debug, Default)]
pub struct ZipAggregation {
    /// BTreeMap for reproducible bucket ordering in the output
    pub by_zip: BTreeMap<String, Vec<OpportunityRow>>,
    pub virtual_opps: Vec<OpportunityRow>,
}

impl ZipAggregation {
    /// Number of rows across buckets and the virtual list.
    pub fn total(&self) -> usize {
        self.by_zip.values().map(Vec::len).sum::<usize>() + self.virtual_opps.len()
    }
}

/// Pulls a 5-digit zip code from a location string like
/// "Los Angeles, CA 90065".
pub fn extract_zipcode(location: &str) -> Option<&str> {
    ZIP_RE.captures(location).map(|caps| caps.get(1).unwrap().as_str())
}

/// True if `s` is exactly a 5-digit zip code.
pub fn is_zipcode(s: &str) -> bool {
    s.len() == 5 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Groups rows by zip code extracted from their location. Rows without a
/// match go to the virtual list. Bucket keys are the exact matched digits;
/// no further normalization.
pub fn aggregate(rows: Vec<OpportunityRow>) -> ZipAggregation {
    let mut agg = ZipAggregation::default();
    for row in rows {
        match extract_zipcode(&row.location) {
            Some(zip) => agg.by_zip.entry(zip.to_string()).or_default().push(row),
            None => agg.virtual_opps.push(row),
        }
    }
    agg
}
