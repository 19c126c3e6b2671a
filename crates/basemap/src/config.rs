//! Tile server configuration.

use std::path::PathBuf;
use std::time::Duration;

use tile_common::TileCoord;

/// Swiss OSM tile server used by default.
pub const DEFAULT_URL_TEMPLATE: &str = "https://tile.osm.ch/switzerland/{z}/{x}/{y}.png";

/// Where to download tiles from and where to keep them.
#[derive(Debug, Clone)]
pub struct TileServerConfig {
    /// URL with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,

    /// Directory holding `{z}-{x}-{y}.png` files.
    pub cache_dir: PathBuf,

    /// Overall timeout for one tile request.
    pub request_timeout: Duration,

    /// Sent with every request; OSM tile servers reject anonymous clients.
    pub user_agent: String,
}

impl Default for TileServerConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            cache_dir: PathBuf::from(storage::disk::DEFAULT_CACHE_DIR),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("dwell-maps/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TileServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TILE_URL_TEMPLATE") {
            config.url_template = val;
        }

        if let Ok(val) = std::env::var("TILE_CACHE_DIR") {
            config.cache_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("TILE_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(val) = std::env::var("TILE_USER_AGENT") {
            config.user_agent = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(format!(
                    "url_template '{}' is missing the {} placeholder",
                    self.url_template, placeholder
                ));
            }
        }

        if self.request_timeout.is_zero() {
            return Err("request_timeout must be > 0".to_string());
        }

        Ok(())
    }

    /// Concrete URL for a tile.
    pub fn tile_url(&self, coord: &TileCoord) -> String {
        self.url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}
