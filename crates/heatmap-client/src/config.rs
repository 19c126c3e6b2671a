//! API endpoints and credentials.

use std::fmt;
use std::time::Duration;

use crate::{HeatmapError, HeatmapResult};

pub const DEFAULT_BASE_URL: &str = "https://api.swisscom.com/layer/heatmaps/demo";
pub const DEFAULT_TOKEN_URL: &str = "https://consent.swisscom.com/o/oauth2/token";

/// Connection settings for the Heatmaps API.
#[derive(Clone)]
pub struct HeatmapApiConfig {
    /// Customer key from the Swisscom digital marketplace
    pub client_id: String,
    /// Customer secret from the Swisscom digital marketplace
    pub client_secret: String,
    pub base_url: String,
    pub token_url: String,
    pub request_timeout: Duration,
}

impl HeatmapApiConfig {
    /// Config with the public endpoints and the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load from `CLIENT_ID`, `CLIENT_SECRET` and the optional
    /// `HEATMAP_API_URL` / `HEATMAP_TOKEN_URL` overrides.
    pub fn from_env() -> HeatmapResult<Self> {
        let client_id =
            std::env::var("CLIENT_ID").map_err(|_| HeatmapError::MissingCredentials("CLIENT_ID"))?;
        let client_secret = std::env::var("CLIENT_SECRET")
            .map_err(|_| HeatmapError::MissingCredentials("CLIENT_SECRET"))?;

        let mut config = Self::new(client_id, client_secret);

        if let Ok(val) = std::env::var("HEATMAP_API_URL") {
            config.base_url = val;
        }
        if let Ok(val) = std::env::var("HEATMAP_TOKEN_URL") {
            config.token_url = val;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> HeatmapResult<()> {
        if self.client_id.is_empty() {
            return Err(HeatmapError::MissingCredentials("CLIENT_ID"));
        }
        if self.client_secret.is_empty() {
            return Err(HeatmapError::MissingCredentials("CLIENT_SECRET"));
        }
        for (name, url) in [("base_url", &self.base_url), ("token_url", &self.token_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(HeatmapError::Config(format!(
                    "{name} '{url}' is not an http(s) URL"
                )));
            }
        }
        if self.request_timeout.is_zero() {
            return Err(HeatmapError::Config("request_timeout must be > 0".to_string()));
        }
        Ok(())
    }

    /// `base_url` joined with `path`, tolerating a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for HeatmapApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeatmapApiConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let mut config = HeatmapApiConfig::new("id", "secret");
        assert_eq!(
            config.endpoint("grids/districts/261"),
            "https://api.swisscom.com/layer/heatmaps/demo/grids/districts/261"
        );

        config.base_url = "http://127.0.0.1:9000/".to_string();
        assert_eq!(config.endpoint("/x"), "http://127.0.0.1:9000/x");
    }

    #[test]
    fn test_validate() {
        assert!(HeatmapApiConfig::new("id", "secret").validate().is_ok());
        assert!(matches!(
            HeatmapApiConfig::new("", "secret").validate(),
            Err(HeatmapError::MissingCredentials("CLIENT_ID"))
        ));

        let mut config = HeatmapApiConfig::new("id", "secret");
        config.token_url = "consent.swisscom.com".to_string();
        assert!(matches!(config.validate(), Err(HeatmapError::Config(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", HeatmapApiConfig::new("id", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }
}
