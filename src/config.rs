//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base origin used to resolve root-relative links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Search results page URL
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// WebDriver endpoint (chromedriver)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser headless
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Navigation and initial row-attachment timeout in milliseconds
    #[serde(default = "default_page_load_timeout_ms")]
    pub page_load_timeout_ms: u64,

    /// Fixed delay after row attachment, for client-side rendering to finish
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Timeout for row-count growth after a "load more" click
    #[serde(default = "default_load_more_wait_ms")]
    pub load_more_wait_ms: u64,

    /// Base delay between "load more" requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Hard cap on "load more" expansion attempts
    #[serde(default = "default_max_load_more_clicks")]
    pub max_load_more_clicks: usize,

    /// Directory for records, boundary cache, and map output
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// CA zip code boundary GeoJSON source (Census ZCTA via OpenDataDE)
    #[serde(default = "default_boundaries_url")]
    pub boundaries_url: String,

    /// Boundary cache file; defaults to `<output_dir>/ca_zipcodes.geojson`
    #[serde(default)]
    pub boundaries_cache: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://volunteer.laworks.com".to_string()
}

fn default_search_url() -> String {
    "https://volunteer.laworks.com/search".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_page_load_timeout_ms() -> u64 {
    60_000
}

fn default_settle_delay_ms() -> u64 {
    3_000
}

fn default_load_more_wait_ms() -> u64 {
    5_000
}

fn default_delay_ms() -> u64 {
    1_500
}

fn default_delay_jitter_ms() -> u64 {
    500
}

fn default_max_load_more_clicks() -> usize {
    20
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_boundaries_url() -> String {
    "https://raw.githubusercontent.com/OpenDataDE/State-zip-code-GeoJSON/master/ca_california_zip_codes_geo.min.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_url: default_search_url(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            page_load_timeout_ms: default_page_load_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            load_more_wait_ms: default_load_more_wait_ms(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            max_load_more_clicks: default_max_load_more_clicks(),
            output_dir: default_output_dir(),
            boundaries_url: default_boundaries_url(),
            boundaries_cache: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("vol-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(webdriver) = std::env::var("VOL_WEBDRIVER") {
            self.webdriver_url = webdriver;
        }

        if let Ok(delay) = std::env::var("VOL_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(dir) = std::env::var("VOL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        self
    }

    /// Resolved path of the boundary cache file.
    pub fn boundaries_cache_path(&self) -> PathBuf {
        self.boundaries_cache
            .clone()
            .unwrap_or_else(|| self.output_dir.join("ca_zipcodes.geojson"))
    }
}
