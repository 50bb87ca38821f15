//! Static map rendering: embeds the joined feature collection into an
//! inline Leaflet choropleth template. Pure presentation; all shaping of
//! the data happens in the geo modules.

use crate::geo::features::MapData;
use serde_json::json;

const TEMPLATE: &str = include_str!("map.html");

/// Renders the standalone map HTML with all data inlined.
pub fn render_map(data: &MapData) -> String {
    let geojson = data.collection.to_string();
    let virtual_opps = serde_json::to_string(&data.virtual_opps).unwrap_or_else(|_| "[]".to_string());
    let stats = json!({
        "total": data.stats.total,
        "zip_count": data.stats.zip_count,
        "virtual_count": data.stats.virtual_count,
        "max_count": data.stats.max_count,
    })
    .to_string();

    TEMPLATE
        .replace("__GEOJSON__", &geojson)
        .replace("__VIRTUAL_OPPS__", &virtual_opps)
        .replace("__STATS__", &stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::features::build_map_data;
    use crate::geo::zip::OpportunityRow;
    use serde_json::json;

    #[test]
    fn test_render_embeds_data() {
        let features = vec![json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": [] },
            "properties": { "zipcode": "90065", "count": 2, "opportunities": [] },
        })];
        let virtuals = vec![OpportunityRow {
            title: "Remote Mentor".to_string(),
            organization: "Mentors Inc".to_string(),
            location: "Remote".to_string(),
            ..Default::default()
        }];

        let html = render_map(&build_map_data(features, &virtuals));

        assert!(html.contains("\"zipcode\":\"90065\""));
        assert!(html.contains("Remote Mentor"));
        assert!(html.contains("\"max_count\":2"));
        // All placeholders substituted
        assert!(!html.contains("__GEOJSON__"));
        assert!(!html.contains("__VIRTUAL_OPPS__"));
        assert!(!html.contains("__STATS__"));
    }

    #[test]
    fn test_render_empty_data() {
        let html = render_map(&build_map_data(Vec::new(), &[]));
        assert!(html.contains("\"max_count\":1"));
        assert!(html.contains("FeatureCollection"));
    }
}
