//! Final feature-collection assembly and summary statistics for the
//! presentation layer.

use crate::geo::join::OpportunitySummary;
use crate::geo::zip::OpportunityRow;
use serde::Serialize;
use serde_json::{json, Value};

/// Summary scalars consumed by the map header and color scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapStats {
    /// Sum of per-feature counts
    pub total: usize,
    /// Distinct zips with a matched polygon
    pub zip_count: usize,
    /// Records with no resolvable zip code
    pub virtual_count: usize,
    /// Largest per-feature count; 1 when no features exist, so the color
    /// scale never divides by zero
    pub max_count: usize,
}

/// Everything the rendering layer embeds as inline data.
#[derive(Debug)]
pub struct MapData {
    pub collection: Value,
    pub virtual_opps: Vec<OpportunitySummary>,
    pub stats: MapStats,
}

/// Wraps joined features into a FeatureCollection and computes the summary
/// scalars.
pub fn build_map_data(features: Vec<Value>, virtual_rows: &[OpportunityRow]) -> MapData {
    let counts: Vec<usize> = features
        .iter()
        .map(|f| f["properties"]["count"].as_u64().unwrap_or(0) as usize)
        .collect();

    let stats = MapStats {
        total: counts.iter().sum(),
        zip_count: features.len(),
        virtual_count: virtual_rows.len(),
        max_count: counts.iter().copied().max().unwrap_or(0).max(1),
    };

    let virtual_opps: Vec<OpportunitySummary> =
        virtual_rows.iter().map(OpportunitySummary::from).collect();

    MapData {
        collection: json!({ "type": "FeatureCollection", "features": features }),
        virtual_opps,
        stats,
    }
}
