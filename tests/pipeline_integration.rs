//! Integration tests running extracted rows through the full map pipeline.

use scraper::{Html, Selector};
use serde_json::{json, Value};
use vol_crawler::geo::{aggregate, build_map_data, join, OpportunityRow};
use vol_crawler::laworks::extractor::Extractor;
use vol_crawler::laworks::models::OpportunityType;
use vol_crawler::render;

const ROWS_FIXTURE: &str = include_str!("fixtures/search_rows.html");

fn fixture_rows() -> Vec<String> {
    let doc = Html::parse_document(ROWS_FIXTURE);
    let sel = Selector::parse("tbody tr").unwrap();
    doc.select(&sel).map(|row| row.html()).collect()
}

fn boundaries(zips: &[&str]) -> Value {
    let features: Vec<Value> = zips
        .iter()
        .map(|zip| {
            json!({
                "type": "Feature",
                "properties": {"ZCTA5CE10": zip},
                "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0]]]}
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

#[test]
fn test_extract_fixture_rows() {
    let extractor = Extractor::new("https://volunteer.laworks.com");
    let rows = fixture_rows();
    assert_eq!(rows.len(), 3);

    let first = extractor.extract_row(&rows[0]).unwrap();
    assert_eq!(first.title, "River Cleanup at Elysian Valley");
    assert_eq!(first.organization, "Friends of the LA River");
    assert_eq!(first.location, "2944 Gleneden St, Los Angeles, CA 90039");
    assert_eq!(first.opportunity_type, OpportunityType::VolunteerOpportunity);
    assert_eq!(first.date.as_deref(), Some("Sat, Sep 12"));
    assert_eq!(first.datetime_iso.as_deref(), Some("2026-09-12T09:00:00"));
    assert_eq!(first.duration.as_deref(), Some("3 hrs"));
    assert_eq!(first.distance.as_deref(), Some("4.2 miles"));
    assert_eq!(
        first.opportunity_url.as_deref(),
        Some("https://volunteer.laworks.com/opportunity/a00U8000000abcDEF")
    );
    assert_eq!(first.opportunity_id.as_deref(), Some("a00U8000000abcDEF"));

    let second = extractor.extract_row(&rows[1]).unwrap();
    assert_eq!(second.opportunity_type, OpportunityType::SpecialEvent);
    assert_eq!(second.organization_url.as_deref(), Some("https://example.org/food-forward"));
    assert!(second.duration.is_none());

    // Open-ended listing: the bare "Ongoing" cell lands in the date field
    let third = extractor.extract_row(&rows[2]).unwrap();
    assert_eq!(third.date.as_deref(), Some("Ongoing"));
    assert!(third.time.is_none());
    assert!(third.datetime_iso.is_none());
    assert_eq!(third.distance.as_deref(), Some(""));
}

#[test]
fn test_scraped_records_feed_the_map_pipeline() {
    let extractor = Extractor::new("https://volunteer.laworks.com");
    let opportunities: Vec<_> = fixture_rows()
        .iter()
        .map(|html| extractor.extract_row(html).unwrap())
        .collect();

    // Records round-trip through JSON the same way the map command reads them
    let serialized = serde_json::to_string(&opportunities).unwrap();
    let rows: Vec<OpportunityRow> = serde_json::from_str(&serialized).unwrap();

    let agg = aggregate(rows);
    assert_eq!(agg.by_zip.len(), 2);
    assert_eq!(agg.by_zip["90039"].len(), 1);
    assert_eq!(agg.by_zip["90049"].len(), 1);
    assert_eq!(agg.virtual_opps.len(), 1);
    assert_eq!(agg.total(), 3);

    let boundaries = boundaries(&["90039", "90049", "90001"]);
    let output = join(&boundaries, &agg).unwrap();
    assert_eq!(output.features.len(), 2);
    assert!(output.unmatched_zips.is_empty());

    let data = build_map_data(output.features, &agg.virtual_opps);
    assert_eq!(data.stats.total, 3);
    assert_eq!(data.stats.zip_count, 2);
    assert_eq!(data.stats.virtual_count, 1);
    assert_eq!(data.stats.max_count, 1);

    let html = render::render_map(&data);
    assert!(html.contains("River Cleanup at Elysian Valley"));
    assert!(html.contains("Virtual Crisis Text Counselor"));
    assert!(!html.contains("__GEOJSON__"));
}

#[test]
fn test_located_and_remote_rows_partition() {
    let rows = vec![
        OpportunityRow {
            title: "Tree Planting".into(),
            organization: "City Plants".into(),
            location: "123 Main St, Los Angeles, CA 90065".into(),
            ..Default::default()
        },
        OpportunityRow {
            title: "Remote Mentor".into(),
            organization: "Mentors Inc".into(),
            location: "Remote".into(),
            ..Default::default()
        },
    ];

    let agg = aggregate(rows);
    let output = join(&boundaries(&["90001", "90065"]), &agg).unwrap();

    // Only the matched zip becomes a feature, the untouched polygon is dropped
    assert_eq!(output.features.len(), 1);
    let props = &output.features[0]["properties"];
    assert_eq!(props["zipcode"], "90065");
    assert_eq!(props["count"], 1);
    assert_eq!(props["opportunities"][0]["title"], "Tree Planting");

    let data = build_map_data(output.features, &agg.virtual_opps);
    assert_eq!(data.stats.virtual_count, 1);
    assert_eq!(data.virtual_opps[0].title, "Remote Mentor");
}

#[test]
fn test_unmatched_zip_is_reported_not_dropped_silently() {
    let rows = vec![OpportunityRow {
        title: "Beach Cleanup".into(),
        organization: "Heal the Bay".into(),
        location: "Santa Monica, CA 90401".into(),
        ..Default::default()
    }];

    let agg = aggregate(rows);
    let output = join(&boundaries(&["90001"]), &agg).unwrap();

    assert!(output.features.is_empty());
    assert_eq!(output.unmatched_zips, vec!["90401".to_string()]);
}
