//! PHC insight API HTTP client.

use async_trait::async_trait;
use phc_core::{
    normalize_alert_feed, normalize_facility_list, normalize_telecom_advice,
    normalize_underserved_response_with, unwrap_collection, AlertFeedEntry, Facility,
    TelecomAdvice, UnderservedResponse, DEFAULT_TOP_N,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{HealthStatus, PhcApi};
use crate::config::ApiConfig;
use crate::error::{status_message, ApiError};
use crate::params::ApiParams;

/// Client for the PHC insight API.
#[derive(Clone)]
pub struct PhcApiClient {
    http: Client,
    config: ApiConfig,
}

impl PhcApiClient {
    /// Build a client. No request is made until the first call.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch an endpoint and return its raw JSON body.
    pub async fn get_json(&self, path: &str, params: &ApiParams) -> Result<Value, ApiError> {
        let url = self.config.endpoint_url(path);
        debug!("GET {} {:?}", url, params.to_query());

        let response = self
            .http
            .get(&url)
            .header("Content-Type", "application/json")
            .query(&params.to_query())
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", path, e);
                ApiError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::Http)?;

        if !status.is_success() {
            let message = status_message(status.as_u16(), &body);
            warn!("{} returned HTTP {}: {}", path, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("{} returned malformed JSON: {}", path, e);
            ApiError::Json(e)
        })
    }
}

#[async_trait]
impl PhcApi for PhcApiClient {
    async fn outbreak_alerts(&self, params: &ApiParams) -> Result<Vec<Facility>, ApiError> {
        let payload = self.get_json("outbreak-alerts", params).await?;
        Ok(normalize_facility_list(&payload))
    }

    async fn underserved(&self, params: &ApiParams) -> Result<UnderservedResponse, ApiError> {
        let payload = self.get_json("underserved", params).await?;
        let top_n = params.requested_top_n().unwrap_or(DEFAULT_TOP_N);
        Ok(normalize_underserved_response_with(&payload, top_n))
    }

    async fn alerts_feed(&self, params: &ApiParams) -> Result<Vec<AlertFeedEntry>, ApiError> {
        let payload = self.get_json("alerts-feed", params).await?;
        Ok(normalize_alert_feed(&payload))
    }

    async fn telecom_advice(
        &self,
        facility_name: &str,
        params: &ApiParams,
    ) -> Result<Vec<TelecomAdvice>, ApiError> {
        let params = params.clone().with("name", facility_name);
        let payload = self.get_json("telecom-advice", &params).await?;
        Ok(normalize_telecom_advice(&payload))
    }

    async fn resource_warnings(&self, params: &ApiParams) -> Result<Vec<Value>, ApiError> {
        let payload = self.get_json("resource-warnings", params).await?;
        Ok(unwrap_collection(&payload, &["data"]).to_vec())
    }

    async fn metrics_summary(&self, params: &ApiParams) -> Result<Value, ApiError> {
        self.get_json("metrics-summary", params).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let payload = self.get_json("health", &ApiParams::new()).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

impl std::fmt::Debug for PhcApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhcApiClient")
            .field("config", &self.config)
            .finish()
    }
}
