//! The API surface consumed by the dashboard.

use async_trait::async_trait;
use phc_core::{AlertFeedEntry, Facility, TelecomAdvice, UnderservedResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::params::ApiParams;

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Source of normalized dashboard data.
///
/// [`PhcApiClient`](crate::PhcApiClient) is the HTTP implementation; tests and
/// offline modes can supply their own.
#[async_trait]
pub trait PhcApi: Send + Sync {
    /// `GET /outbreak-alerts`, normalized to facilities.
    async fn outbreak_alerts(&self, params: &ApiParams) -> Result<Vec<Facility>, ApiError>;

    /// `GET /underserved`, normalized with a computed summary.
    async fn underserved(&self, params: &ApiParams) -> Result<UnderservedResponse, ApiError>;

    /// `GET /alerts-feed`, normalized to feed entries.
    async fn alerts_feed(&self, params: &ApiParams) -> Result<Vec<AlertFeedEntry>, ApiError>;

    /// `GET /telecom-advice?name=<facility>`.
    async fn telecom_advice(
        &self,
        facility_name: &str,
        params: &ApiParams,
    ) -> Result<Vec<TelecomAdvice>, ApiError>;

    /// `GET /resource-warnings`, records passed through unnormalized.
    async fn resource_warnings(&self, params: &ApiParams) -> Result<Vec<Value>, ApiError>;

    /// `GET /metrics-summary`, passed through.
    async fn metrics_summary(&self, params: &ApiParams) -> Result<Value, ApiError>;

    /// `GET /health`.
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
