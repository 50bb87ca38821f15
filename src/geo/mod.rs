//! Zip-code aggregation and boundary joining for the choropleth map.

pub mod boundaries;
pub mod features;
pub mod join;
pub mod zip;

pub use boundaries::BoundarySource;
pub use features::{build_map_data, MapData, MapStats};
pub use join::{join, JoinError, JoinOutput, OpportunitySummary};
pub use zip::{aggregate, extract_zipcode, OpportunityRow, ZipAggregation};
