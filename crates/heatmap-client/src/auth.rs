//! OAuth2 client-credentials token.

use chrono::{DateTime, Duration, Local, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::{HeatmapApiConfig, HeatmapError, HeatmapResult};

/// Bearer token and its expiry. Fetched once, never refreshed.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// `None` when the server did not send `expires_in`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Human-readable expiry in local time, e.g. `27 January 2020 at 09:15:00`.
    pub fn expiry_display(&self) -> Option<String> {
        self.expires_at.map(|at| {
            at.with_timezone(&Local)
                .format("%d %B %Y at %H:%M:%S")
                .to_string()
        })
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchange the client credentials for a bearer token.
#[instrument(skip(http, config), fields(token_url = %config.token_url))]
pub async fn fetch_token(http: &Client, config: &HeatmapApiConfig) -> HeatmapResult<AccessToken> {
    let requested_at = Utc::now();

    let response = http
        .post(&config.token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(HeatmapError::Auth(format!(
            "token endpoint returned HTTP {}: {}",
            status.as_u16(),
            body.trim()
        )));
    }

    let token: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| HeatmapError::Auth(format!("unexpected token response: {e}")))?;
    if token.access_token.is_empty() {
        return Err(HeatmapError::Auth("empty access token".to_string()));
    }

    let expires_at = token
        .expires_in
        .map(|secs| requested_at + Duration::seconds(secs));
    let token = AccessToken::new(token.access_token, expires_at);

    match token.expiry_display() {
        Some(expiry) => info!("Token expires on: {}", expiry),
        None => debug!("Token carries no expiry"),
    }

    Ok(token)
}
