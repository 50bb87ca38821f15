//! Boundary matching: detect the zip-bearing property key and join
//! aggregated opportunity counts onto boundary polygons.

use crate::geo::zip::{is_zipcode, OpportunityRow, ZipAggregation};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

/// Common names for the zip-code property, tried before scanning all keys.
const ZIP_KEY_CANDIDATES: [&str; 7] =
    ["ZCTA5CE10", "ZCTA5CE20", "ZIP", "ZIPCODE", "zip", "GEOID10", "GEOID20"];

/// Boundary features scanned for key auto-detection.
const KEY_DETECT_SAMPLE: usize = 5;

/// Fatal configuration errors; no join is possible without a resolvable key.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("boundary data has no features array")]
    MissingFeatures,
    #[error("cannot find a zip code property in boundary data; available keys: {0:?}")]
    ZipKeyNotFound(Vec<String>),
}

/// Display projection of a record, embedded in joined features and the
/// virtual list.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunitySummary {
    pub title: String,
    pub organization: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub opportunity_type: String,
    pub url: String,
}

impl From<&OpportunityRow> for OpportunitySummary {
    fn from(row: &OpportunityRow) -> Self {
        Self {
            title: row.title.clone(),
            organization: row.organization.clone(),
            date: row.date.clone().unwrap_or_default(),
            time: row.time.clone().unwrap_or_default(),
            opportunity_type: row.opportunity_type.clone().unwrap_or_default(),
            url: row.opportunity_url.clone().unwrap_or_default(),
        }
    }
}

/// Joined features plus the zips that matched no boundary polygon.
#[derive(Debug)]
pub struct JoinOutput {
    pub features: Vec<Value>,
    pub unmatched_zips: Vec<String>,
}

/// Auto-detects the property key holding the zip code: candidate names
/// first, then any key whose string value is exactly five digits.
pub fn detect_zip_key(features: &[Value]) -> Option<String> {
    for feature in features.iter().take(KEY_DETECT_SAMPLE) {
        let Some(props) = feature.get("properties").and_then(Value::as_object) else {
            continue;
        };

        for key in ZIP_KEY_CANDIDATES {
            if let Some(value) = props.get(key).and_then(Value::as_str) {
                if is_zipcode(value) {
                    return Some(key.to_string());
                }
            }
        }

        for (key, value) in props {
            if let Some(s) = value.as_str() {
                if is_zipcode(s) {
                    return Some(key.clone());
                }
            }
        }
    }
    None
}

/// Joins the aggregation onto boundary polygons. Geometry passes through
/// unchanged; properties are replaced by {zipcode, count, opportunities}.
/// Zips with no matching polygon are reported, not reassigned.
pub fn join(boundaries: &Value, agg: &ZipAggregation) -> Result<JoinOutput, JoinError> {
    let features = boundaries
        .get("features")
        .and_then(Value::as_array)
        .ok_or(JoinError::MissingFeatures)?;

    let zip_key = detect_zip_key(features).ok_or_else(|| {
        let available = features
            .first()
            .and_then(|f| f.get("properties"))
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default();
        JoinError::ZipKeyNotFound(available)
    })?;

    let mut joined = Vec::new();
    let mut matched = BTreeSet::new();

    for feature in features {
        let Some(zc) = property_as_string(feature, &zip_key) else {
            continue;
        };
        let Some(bucket) = agg.by_zip.get(&zc) else {
            continue;
        };

        let summaries: Vec<OpportunitySummary> =
            bucket.iter().map(OpportunitySummary::from).collect();
        joined.push(json!({
            "type": "Feature",
            "geometry": feature.get("geometry").cloned().unwrap_or(Value::Null),
            "properties": {
                "zipcode": zc,
                "count": bucket.len(),
                "opportunities": summaries,
            },
        }));
        matched.insert(zc);
    }

    let unmatched_zips: Vec<String> =
        agg.by_zip.keys().filter(|z| !matched.contains(*z)).cloned().collect();
    if !unmatched_zips.is_empty() {
        // Accepted data loss: these opportunities are absent from the map
        warn!(
            "{} zip codes not found in boundaries: {:?}",
            unmatched_zips.len(),
            &unmatched_zips[..unmatched_zips.len().min(10)]
        );
    }

    Ok(JoinOutput { features: joined, unmatched_zips })
}

fn property_as_string(feature: &Value, key: &str) -> Option<String> {
    match feature.get("properties")?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::zip::aggregate;

    fn boundary(zip_key: &str, zip: &str) -> Value {
        json!({
            "type": "Feature",
            "properties": { zip_key: zip, "NAME": "somewhere" },
            "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]] },
        })
    }

    fn row(title: &str, location: &str) -> OpportunityRow {
        OpportunityRow {
            title: title.to_string(),
            organization: "Org".to_string(),
            location: location.to_string(),
            opportunity_type: Some("Volunteer Opportunity".to_string()),
            opportunity_url: Some("https://volunteer.laworks.com/opportunity/a1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_zip_key_candidate() {
        let features = vec![boundary("ZCTA5CE10", "90001")];
        assert_eq!(detect_zip_key(&features), Some("ZCTA5CE10".to_string()));
    }

    #[test]
    fn test_detect_zip_key_unconventional_name() {
        // Key name unknown, but its value is a 5-digit string
        let features = vec![json!({
            "type": "Feature",
            "properties": { "area_label": "South LA", "postal_region": "90001" },
            "geometry": null,
        })];
        assert_eq!(detect_zip_key(&features), Some("postal_region".to_string()));
    }

    #[test]
    fn test_detect_zip_key_skips_bad_values() {
        // Candidate key present but value not a zip; scan falls through
        let features = vec![json!({
            "type": "Feature",
            "properties": { "ZIP": "n/a", "code": "90210" },
            "geometry": null,
        })];
        assert_eq!(detect_zip_key(&features), Some("code".to_string()));
    }

    #[test]
    fn test_detect_zip_key_none() {
        let features = vec![json!({
            "type": "Feature",
            "properties": { "NAME": "somewhere", "AREA": 12.5 },
            "geometry": null,
        })];
        assert_eq!(detect_zip_key(&features), None);
    }

    #[test]
    fn test_detect_zip_key_beyond_sample() {
        // Only the first few features are scanned
        let mut features = vec![
            json!({"type": "Feature", "properties": {"NAME": "x"}, "geometry": null});
            KEY_DETECT_SAMPLE
        ];
        features.push(boundary("ZIP", "90001"));
        assert_eq!(detect_zip_key(&features), None);
    }

    #[test]
    fn test_join_counts_and_zipcodes() {
        let boundaries = json!({
            "type": "FeatureCollection",
            "features": [boundary("ZCTA5CE10", "90001"), boundary("ZCTA5CE10", "90002")],
        });
        let agg = aggregate(vec![row("A", "LA, CA 90001"), row("B", "LA, CA 90001")]);

        let output = join(&boundaries, &agg).unwrap();

        assert_eq!(output.features.len(), 1);
        let props = &output.features[0]["properties"];
        assert_eq!(props["zipcode"], "90001");
        assert_eq!(props["count"], 2);
        assert_eq!(props["opportunities"].as_array().unwrap().len(), 2);
        assert!(output.unmatched_zips.is_empty());
        // Geometry passes through unchanged
        assert_eq!(output.features[0]["geometry"]["type"], "Polygon");
    }

    #[test]
    fn test_join_reports_unmatched_zips() {
        let boundaries =
            json!({ "type": "FeatureCollection", "features": [boundary("ZIP", "90001")] });
        let agg = aggregate(vec![row("A", "LA, CA 90001"), row("B", "Lancaster, CA 93534")]);

        let output = join(&boundaries, &agg).unwrap();

        assert_eq!(output.features.len(), 1);
        assert_eq!(output.unmatched_zips, vec!["93534"]);
    }

    #[test]
    fn test_join_summary_projection() {
        let boundaries =
            json!({ "type": "FeatureCollection", "features": [boundary("ZIP", "90001")] });
        let mut r = row("Cleanup", "LA, CA 90001");
        r.date = Some("Sat, Sep 12".to_string());
        let agg = aggregate(vec![r]);

        let output = join(&boundaries, &agg).unwrap();
        let summary = &output.features[0]["properties"]["opportunities"][0];
        assert_eq!(summary["title"], "Cleanup");
        assert_eq!(summary["organization"], "Org");
        assert_eq!(summary["date"], "Sat, Sep 12");
        assert_eq!(summary["type"], "Volunteer Opportunity");
        assert_eq!(summary["url"], "https://volunteer.laworks.com/opportunity/a1");
        // Absent fields project to empty strings, not nulls
        assert_eq!(summary["time"], "");
    }

    #[test]
    fn test_join_numeric_zip_property() {
        let boundaries = json!({
            "type": "FeatureCollection",
            "features": [
                boundary("ZIP", "90001"),
                { "type": "Feature", "properties": {"ZIP": 90002}, "geometry": null },
            ],
        });
        let agg = aggregate(vec![row("A", "LA, CA 90002")]);

        let output = join(&boundaries, &agg).unwrap();
        assert_eq!(output.features.len(), 1);
        assert_eq!(output.features[0]["properties"]["zipcode"], "90002");
    }

    #[test]
    fn test_join_no_zip_key_is_fatal() {
        let boundaries = json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "properties": {"NAME": "x"}, "geometry": null }],
        });
        let agg = aggregate(vec![row("A", "LA, CA 90001")]);

        let err = join(&boundaries, &agg).unwrap_err();
        match err {
            JoinError::ZipKeyNotFound(keys) => assert_eq!(keys, vec!["NAME"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_join_missing_features_array() {
        let err = join(&json!({"type": "FeatureCollection"}), &ZipAggregation::default())
            .unwrap_err();
        assert!(matches!(err, JoinError::MissingFeatures));
    }
}
