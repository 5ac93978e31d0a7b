use std::time::Duration;

use anyhow::{bail, Context};
use axum::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tracing::{error, instrument};

use crate::error::{ApiError, ApiResult};
use crate::response::Envelope;
use crate::state::AppState;

/// External geolocation collaborator, behind a trait so tests can swap in a
/// canned implementation.
#[async_trait]
pub trait IpLookup: Send + Sync {
    /// Resolve the service's own public IP and its geolocation record.
    async fn lookup_own(&self) -> anyhow::Result<Value>;
}

/// ipquery.io-backed lookup. The base endpoint answers with the caller's
/// public IP in plain text; `/{ip}` answers with the geolocation record.
pub struct IpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for IP lookups")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl IpLookup for IpApiClient {
    async fn lookup_own(&self) -> anyhow::Result<Value> {
        let base = self.base_url.trim_end_matches('/');

        let own_ip = self
            .http
            .get(format!("{base}/"))
            .send()
            .await
            .context("own-IP request failed")?
            .error_for_status()
            .context("own-IP request rejected")?
            .text()
            .await
            .context("own-IP response unreadable")?;
        let own_ip = own_ip.trim();
        if own_ip.is_empty() {
            bail!("own-IP response was empty");
        }

        let info = self
            .http
            .get(format!("{base}/{own_ip}"))
            .send()
            .await
            .context("geolocation request failed")?
            .error_for_status()
            .context("geolocation request rejected")?
            .json::<Value>()
            .await
            .context("geolocation response was not JSON")?;
        Ok(info)
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ip", get(lookup_ip))
}

/// GET /ip — the service's own public IP and location, straight from the
/// collaborator.
#[instrument(skip(state))]
pub async fn lookup_ip(State(state): State<AppState>) -> ApiResult<Envelope<Value>> {
    match state.geoip.lookup_own().await {
        Ok(info) => Ok(Envelope::data(StatusCode::OK, info)),
        Err(e) => {
            error!(error = %e, "IP lookup failed");
            Err(ApiError::bad_request("Error getting IP"))
        }
    }
}
