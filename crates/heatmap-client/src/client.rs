//! Authenticated queries against the Heatmaps API.

use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::auth::{fetch_token, AccessToken};
use crate::types::{DistrictGrid, DwellDensity, HOUR_FORMAT};
use crate::{HeatmapApiConfig, HeatmapError, HeatmapResult};

/// Most tile ids one dwell-density request may carry.
pub const MAX_TILES_PER_REQUEST: usize = 100;

/// API version header sent with every data request.
const API_VERSION_HEADER: (&str, &str) = ("scs-version", "2");

/// Heatmaps API session holding one bearer token.
#[derive(Debug, Clone)]
pub struct HeatmapClient {
    http: Client,
    config: HeatmapApiConfig,
    token: AccessToken,
}

impl HeatmapClient {
    /// Fetch a token and return a ready client.
    pub async fn connect(config: HeatmapApiConfig) -> HeatmapResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let token = fetch_token(&http, &config).await?;

        Ok(Self {
            http,
            config,
            token,
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn config(&self) -> &HeatmapApiConfig {
        &self.config
    }

    /// Tiles of a district.
    #[instrument(skip(self))]
    pub async fn tile_ids_for_district(&self, district: u32) -> HeatmapResult<DistrictGrid> {
        let url = self.config.endpoint(&format!("grids/districts/{district}"));
        let grid: DistrictGrid = self.get_json(self.http.get(&url), &url).await?;
        info!(tiles = grid.tiles.len(), "Fetched district grid");
        Ok(grid)
    }

    /// Hourly dwell density for at most [`MAX_TILES_PER_REQUEST`] tiles.
    #[instrument(skip(self, tiles), fields(at = %at.format(HOUR_FORMAT), tiles = tiles.len()))]
    pub async fn dwell_density(
        &self,
        at: NaiveDateTime,
        tiles: &[u64],
    ) -> HeatmapResult<DwellDensity> {
        if tiles.len() > MAX_TILES_PER_REQUEST {
            return Err(HeatmapError::TooManyTiles {
                count: tiles.len(),
                max: MAX_TILES_PER_REQUEST,
            });
        }

        let url = self.config.endpoint(&format!(
            "heatmaps/dwell-density/hourly/{}",
            at.format(HOUR_FORMAT)
        ));
        let query: Vec<(&str, u64)> = tiles.iter().map(|&id| ("tiles", id)).collect();

        let mut density: DwellDensity = self
            .get_json(self.http.get(&url).query(&query), &url)
            .await?;
        density.at = Some(at);
        debug!(scores = density.tiles.len(), "Fetched dwell density");
        Ok(density)
    }

    /// Dwell density for any number of tiles, split into sequential
    /// requests of at most [`MAX_TILES_PER_REQUEST`].
    pub async fn dwell_density_batched(
        &self,
        at: NaiveDateTime,
        tiles: &[u64],
    ) -> HeatmapResult<DwellDensity> {
        let mut merged = DwellDensity {
            at: Some(at),
            tiles: Vec::with_capacity(tiles.len()),
        };
        for chunk in tiles.chunks(MAX_TILES_PER_REQUEST) {
            merged.merge(self.dwell_density(at, chunk).await?);
        }
        Ok(merged)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> HeatmapResult<T> {
        let response = request
            .bearer_auth(self.token.secret())
            .header(API_VERSION_HEADER.0, API_VERSION_HEADER.1)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HeatmapError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| HeatmapError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
