//! Zip-code boundary GeoJSON source with a verbatim file cache.
//!
//! A present cache file is always preferred over re-fetching; there is no
//! freshness check. Single-process, single-run usage model.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use wreq::Client;
use wreq_util::Emulation;

/// Remote boundary collection cached as a local file.
pub struct BoundarySource {
    url: String,
    cache_path: PathBuf,
}

impl BoundarySource {
    /// Creates a source for `url` cached at `cache_path`.
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self { url: url.into(), cache_path: cache_path.into() }
    }

    /// Loads the boundary collection, fetching and caching on a miss.
    pub async fn load(&self) -> Result<Value> {
        if self.cache_path.exists() {
            info!("Loading cached boundaries from {}", self.cache_path.display());
            return read_geojson(&self.cache_path);
        }

        info!("Downloading zip code boundaries from {}", self.url);
        let body = self.fetch().await?;
        let data: Value = serde_json::from_str(&body).context("Boundary response is not valid JSON")?;

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache dir {}", parent.display()))?;
        }
        std::fs::write(&self.cache_path, &body)
            .with_context(|| format!("Failed to write cache file {}", self.cache_path.display()))?;
        let count = data.get("features").and_then(Value::as_array).map_or(0, Vec::len);
        info!("Cached {} boundary features to {}", count, self.cache_path.display());
        Ok(data)
    }

    async fn fetch(&self) -> Result<String> {
        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = client
            .get(&self.url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", concat!("vol-crawler/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .context("Failed to request boundary data")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Boundary download failed with status: {}", status);
        }

        response.text().await.context("Failed to read boundary response body")
    }
}

fn read_geojson(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Cache file {} is not valid JSON", path.display()))
}
