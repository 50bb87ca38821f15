//! Map command: aggregate saved records by zip code, join onto boundary
//! polygons, and write the static choropleth page.

use crate::config::Config;
use crate::geo::{aggregate, build_map_data, join, BoundarySource, OpportunityRow};
use crate::render;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Builds the map from a previously saved record set.
pub struct MapCommand {
    config: Config,
}

impl MapCommand {
    /// Creates a new map command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads records, joins them onto boundaries, and writes `map.html`.
    pub async fn execute(&self, records_path: Option<&Path>) -> Result<PathBuf> {
        let records_path = records_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.output_dir.join("opportunities.json"));

        let rows = read_records(&records_path)?;
        info!("Loaded {} records from {}", rows.len(), records_path.display());

        let agg = aggregate(rows);
        info!(
            "Aggregated into {} zip codes ({} virtual)",
            agg.by_zip.len(),
            agg.virtual_opps.len()
        );

        let source =
            BoundarySource::new(&self.config.boundaries_url, self.config.boundaries_cache_path());
        let boundaries = source.load().await?;

        let output = join(&boundaries, &agg).context("Failed to join boundaries")?;
        let data = build_map_data(output.features, &agg.virtual_opps);

        let html_path = self.config.output_dir.join("map.html");
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create output dir {}", self.config.output_dir.display())
        })?;
        std::fs::write(&html_path, render::render_map(&data))
            .with_context(|| format!("Failed to write {}", html_path.display()))?;

        println!("Map written to {}", html_path.display());
        println!(
            "  {} opportunities across {} zip codes, {} virtual, peak {} per zip",
            data.stats.total, data.stats.zip_count, data.stats.virtual_count, data.stats.max_count
        );
        if !output.unmatched_zips.is_empty() {
            println!(
                "  Warning: {} zip codes had no boundary polygon: {:?}",
                output.unmatched_zips.len(),
                &output.unmatched_zips[..output.unmatched_zips.len().min(10)]
            );
        }

        Ok(html_path)
    }
}

fn read_records(path: &Path) -> Result<Vec<OpportunityRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECORDS: &str = r#"[
        {"title": "Tree Planting", "organization": "City Plants",
         "location": "123 Main St, Los Angeles, CA 90065",
         "opportunity_type": "Volunteer Opportunity",
         "opportunity_url": "https://volunteer.laworks.com/opportunity/a1"},
        {"title": "Remote Mentor", "organization": "Mentors Inc", "location": "Remote"}
    ]"#;

    const BOUNDARIES: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"ZCTA5CE10":"90001"},
         "geometry":{"type":"Polygon","coordinates":[]}},
        {"type":"Feature","properties":{"ZCTA5CE10":"90065"},
         "geometry":{"type":"Polygon","coordinates":[]}}
    ]}"#;

    #[tokio::test]
    async fn test_map_command_end_to_end() {
        let dir = TempDir::new().unwrap();
        let records_path = dir.path().join("opportunities.json");
        std::fs::write(&records_path, RECORDS).unwrap();

        // Pre-seeded cache file, so no network is touched
        let cache = dir.path().join("boundaries.geojson");
        std::fs::write(&cache, BOUNDARIES).unwrap();

        let mut config = Config::default();
        config.output_dir = dir.path().to_path_buf();
        config.boundaries_cache = Some(cache);

        let cmd = MapCommand::new(config);
        let html_path = cmd.execute(Some(&records_path)).await.unwrap();

        let html = std::fs::read_to_string(html_path).unwrap();
        // One matched feature for 90065 with count 1, nothing for 90001
        assert!(html.contains("\"zipcode\":\"90065\""));
        assert!(!html.contains("\"zipcode\":\"90001\""));
        assert!(html.contains("Remote Mentor"));
    }

    #[tokio::test]
    async fn test_map_command_missing_records_file() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().to_path_buf();

        let cmd = MapCommand::new(config);
        let result = cmd.execute(None).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read records file"));
    }

    #[test]
    fn test_read_records_lenient_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.json");
        std::fs::write(&path, r#"[{"title": "T", "organization": "O", "location": "L"}]"#)
            .unwrap();

        let rows = read_records(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].date.is_none());
    }
}
