//! Dashboard data service.
//!
//! Wraps a [`PhcApi`] with a last-known-good cache and the bundled mock
//! fixtures, so every read yields data. The merged alert feed combines the
//! API feed with the local simulated-alert log.

use std::collections::HashMap;
use std::sync::Arc;

use alert_store::{
    merge_feed, AlertSignals, KeyValueStore, ResolvedAlerts, SimulatedAlert, SimulatedAlertStore,
    SimulatedKind,
};
use phc_api::{fixtures, ApiError, ApiParams, ErrorShape, HealthStatus, PhcApi};
use phc_core::{AlertFeedEntry, Facility, TelecomAdvice, UnderservedResponse, DEFAULT_TOP_N};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{MonitorError, Result};

/// Where a piece of dashboard data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Fresh from the API.
    Live,
    /// Last successful response, served after a failed fetch.
    Cached,
    /// Bundled fixture, served when nothing was ever fetched.
    Mock,
}

/// Result of a dashboard read.
#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: Origin,
    /// Set only when the live fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorShape>,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            origin: Origin::Live,
            error: None,
        }
    }

    /// True when the data did not come from a successful fetch.
    pub fn using_mock_data(&self) -> bool {
        self.origin != Origin::Live
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            origin: self.origin,
            error: self.error,
        }
    }
}

/// Last successful responses, keyed by query string.
#[derive(Default)]
struct Cache {
    outbreak: HashMap<String, Vec<Facility>>,
    underserved: HashMap<String, UnderservedResponse>,
    feed: HashMap<String, Vec<AlertFeedEntry>>,
}

impl Cache {
    fn outbreak(&mut self) -> &mut HashMap<String, Vec<Facility>> {
        &mut self.outbreak
    }

    fn underserved(&mut self) -> &mut HashMap<String, UnderservedResponse> {
        &mut self.underserved
    }

    fn feed(&mut self) -> &mut HashMap<String, Vec<AlertFeedEntry>> {
        &mut self.feed
    }
}

fn cache_key(params: &ApiParams) -> String {
    params
        .to_query()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Data access for the dashboard and CLI.
#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn PhcApi>,
    simulated: SimulatedAlertStore,
    resolved: ResolvedAlerts,
    cache: Arc<Mutex<Cache>>,
}

impl DashboardService {
    /// Create a service over an API and a backing store for local state.
    pub fn new(api: Arc<dyn PhcApi>, kv: Arc<dyn KeyValueStore>, signals: AlertSignals) -> Self {
        Self {
            api,
            simulated: SimulatedAlertStore::new(kv.clone(), signals),
            resolved: ResolvedAlerts::new(kv),
            cache: Arc::new(Mutex::new(Cache::default())),
        }
    }

    pub fn simulated(&self) -> &SimulatedAlertStore {
        &self.simulated
    }

    pub fn resolved(&self) -> &ResolvedAlerts {
        &self.resolved
    }

    pub fn signals(&self) -> &AlertSignals {
        self.simulated.signals()
    }

    /// Facilities with outbreak alerts.
    pub async fn facilities(&self, params: &ApiParams) -> Fetched<Vec<Facility>> {
        let result = self.api.outbreak_alerts(params).await;
        self.settle(
            "outbreak alerts",
            params,
            result,
            Cache::outbreak,
            fixtures::mock_outbreak_alerts,
        )
        .await
    }

    /// Underserved ranking and summary.
    pub async fn underserved(&self, params: &ApiParams) -> Fetched<UnderservedResponse> {
        let top_n = params.requested_top_n().unwrap_or(DEFAULT_TOP_N);
        let result = self.api.underserved(params).await;
        self.settle("underserved", params, result, Cache::underserved, || {
            fixtures::mock_underserved(top_n)
        })
        .await
    }

    /// The API feed alone, without simulated alerts.
    pub async fn api_feed(&self, params: &ApiParams) -> Fetched<Vec<AlertFeedEntry>> {
        let result = self.api.alerts_feed(params).await;
        self.settle("alerts feed", params, result, Cache::feed, fixtures::mock_alerts_feed)
            .await
    }

    /// Simulated alerts followed by the API feed.
    pub async fn alerts_feed(&self, params: &ApiParams) -> Fetched<Vec<AlertFeedEntry>> {
        self.api_feed(params)
            .await
            .map(|api| self.merge_with_simulated(api))
    }

    /// The merged feed without entries the operator has resolved.
    pub async fn open_alerts_feed(&self, params: &ApiParams) -> Fetched<Vec<AlertFeedEntry>> {
        self.alerts_feed(params)
            .await
            .map(|entries| self.resolved.retain_unresolved(entries))
    }

    /// Prepend the current simulated log to an API feed.
    pub fn merge_with_simulated(&self, api: Vec<AlertFeedEntry>) -> Vec<AlertFeedEntry> {
        merge_feed(api, &self.simulated.load())
    }

    /// Connectivity advice for one facility. There is no fallback.
    pub async fn telecom_advice(
        &self,
        facility_name: &str,
        params: &ApiParams,
    ) -> Result<Vec<TelecomAdvice>> {
        Ok(self.api.telecom_advice(facility_name, params).await?)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        Ok(self.api.health().await?)
    }

    /// Record a simulated alert for the facility with the given id.
    ///
    /// The facility is looked up in the current outbreak list by id,
    /// canonical name or display name.
    pub async fn send_alert(&self, facility_id: &str, kind: SimulatedKind) -> Result<SimulatedAlert> {
        let facilities = self.facilities(&ApiParams::new()).await.data;
        let facility = find_facility(&facilities, facility_id)
            .ok_or_else(|| MonitorError::UnknownFacility(facility_id.to_string()))?;

        Ok(self.simulated.record(facility, kind)?)
    }

    pub fn clear_alerts(&self) -> Result<()> {
        Ok(self.simulated.clear()?)
    }

    /// Mark a feed entry resolved. Returns false if it already was.
    pub fn resolve(&self, alert_id: &str) -> Result<bool> {
        let changed = self.resolved.resolve(alert_id)?;
        if changed {
            info!(alert_id, "Alert resolved");
        }
        Ok(changed)
    }

    async fn settle<T: Clone>(
        &self,
        what: &str,
        params: &ApiParams,
        result: std::result::Result<T, ApiError>,
        slot: fn(&mut Cache) -> &mut HashMap<String, T>,
        mock: impl FnOnce() -> T,
    ) -> Fetched<T> {
        let key = cache_key(params);
        let mut cache = self.cache.lock().await;

        match result {
            Ok(data) => {
                slot(&mut *cache).insert(key, data.clone());
                Fetched::live(data)
            }
            Err(e) => {
                let shape = e.shape();
                match slot(&mut *cache).get(&key).cloned() {
                    Some(data) => {
                        warn!("API error fetching {}, using cached data: {}", what, e);
                        Fetched {
                            data,
                            origin: Origin::Cached,
                            error: Some(shape),
                        }
                    }
                    None => {
                        warn!("API error fetching {}, using mock data: {}", what, e);
                        Fetched {
                            data: mock(),
                            origin: Origin::Mock,
                            error: Some(shape),
                        }
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("simulated", &self.simulated)
            .finish()
    }
}

fn find_facility<'a>(facilities: &'a [Facility], key: &str) -> Option<&'a Facility> {
    let key = key.trim();
    facilities
        .iter()
        .find(|f| f.id == key)
        .or_else(|| {
            let lowered = key.to_lowercase();
            facilities
                .iter()
                .find(|f| f.canonical_name == lowered || f.display_name.to_lowercase() == lowered)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use alert_store::{AlertSignal, MemoryStore};
    use async_trait::async_trait;
    use phc_core::{normalize_alert_feed, normalize_facility_list, AlertKind};
    use serde_json::{json, Value};

    /// API stub that can be switched between healthy and failing.
    #[derive(Default)]
    struct FakeApi {
        failing: AtomicBool,
    }

    impl FakeApi {
        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> std::result::Result<(), ApiError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(ApiError::Status {
                    status: 503,
                    message: "maintenance".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PhcApi for FakeApi {
        async fn outbreak_alerts(
            &self,
            _params: &ApiParams,
        ) -> std::result::Result<Vec<Facility>, ApiError> {
            self.check()?;
            Ok(normalize_facility_list(&json!([
                {"id": "phc_900", "name": "Dei-Dei PHC", "lga": "Bwari", "shortage_score": 2.4}
            ])))
        }

        async fn underserved(
            &self,
            _params: &ApiParams,
        ) -> std::result::Result<UnderservedResponse, ApiError> {
            self.check()?;
            Ok(phc_core::normalize_underserved_response(&json!([
                {"name": "Dei-Dei PHC", "underserved_index": 0.9}
            ])))
        }

        async fn alerts_feed(
            &self,
            _params: &ApiParams,
        ) -> std::result::Result<Vec<AlertFeedEntry>, ApiError> {
            self.check()?;
            Ok(normalize_alert_feed(&json!([
                {"id": "live_1", "type": "outbreak", "phc_name": "Dei-Dei PHC"}
            ])))
        }

        async fn telecom_advice(
            &self,
            facility_name: &str,
            _params: &ApiParams,
        ) -> std::result::Result<Vec<TelecomAdvice>, ApiError> {
            self.check()?;
            Ok(phc_core::normalize_telecom_advice(&json!([{ "phc_name": facility_name }])))
        }

        async fn resource_warnings(
            &self,
            _params: &ApiParams,
        ) -> std::result::Result<Vec<Value>, ApiError> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn metrics_summary(&self, _params: &ApiParams) -> std::result::Result<Value, ApiError> {
            self.check()?;
            Ok(json!({}))
        }

        async fn health(&self) -> std::result::Result<HealthStatus, ApiError> {
            self.check()?;
            Ok(HealthStatus {
                status: "ok".to_string(),
                message: String::new(),
            })
        }
    }

    fn service() -> (Arc<FakeApi>, DashboardService) {
        let api = Arc::new(FakeApi::default());
        let service = DashboardService::new(
            api.clone(),
            Arc::new(MemoryStore::new()),
            AlertSignals::new(),
        );
        (api, service)
    }

    #[tokio::test]
    async fn test_live_fetch() {
        let (_, service) = service();
        let fetched = service.facilities(&ApiParams::new()).await;

        assert_eq!(fetched.origin, Origin::Live);
        assert!(!fetched.using_mock_data());
        assert!(fetched.error.is_none());
        assert_eq!(fetched.data[0].id, "phc_900");
    }

    #[tokio::test]
    async fn test_failure_without_cache_uses_mock() {
        let (api, service) = service();
        api.fail(true);

        let fetched = service.facilities(&ApiParams::new()).await;
        assert_eq!(fetched.origin, Origin::Mock);
        assert!(fetched.using_mock_data());
        assert_eq!(fetched.data, fixtures::mock_outbreak_alerts());

        let error = fetched.error.unwrap();
        assert_eq!(error.message, "maintenance");
        assert_eq!(error.status, Some(503));
    }

    #[tokio::test]
    async fn test_failure_after_success_uses_cache() {
        let (api, service) = service();
        let live = service.underserved(&ApiParams::new()).await;
        assert_eq!(live.origin, Origin::Live);

        api.fail(true);
        let cached = service.underserved(&ApiParams::new()).await;
        assert_eq!(cached.origin, Origin::Cached);
        assert!(cached.using_mock_data());
        assert_eq!(cached.data, live.data);
        assert!(cached.error.is_some());
    }

    #[tokio::test]
    async fn test_cache_is_per_query() {
        let (api, service) = service();
        let live = service.underserved(&ApiParams::new().top_n(2)).await;
        assert_eq!(live.origin, Origin::Live);

        api.fail(true);
        let other = service.underserved(&ApiParams::new().top_n(3)).await;
        assert_eq!(other.origin, Origin::Mock);
        assert_eq!(other.data.summary.top_underserved_facilities.len(), 3);

        let same = service.underserved(&ApiParams::new().top_n(2)).await;
        assert_eq!(same.origin, Origin::Cached);
        assert_eq!(same.data, live.data);
    }

    #[tokio::test]
    async fn test_mock_underserved_honours_top_n() {
        let (api, service) = service();
        api.fail(true);

        let fetched = service.underserved(&ApiParams::new().top_n(3)).await;
        assert_eq!(fetched.data.summary.top_underserved_facilities.len(), 3);
    }

    #[tokio::test]
    async fn test_feed_puts_simulated_first() {
        let (_, service) = service();
        let alert = service
            .send_alert("phc_900", SimulatedKind::Resource)
            .await
            .unwrap();

        let feed = service.alerts_feed(&ApiParams::new()).await;
        assert_eq!(feed.origin, Origin::Live);
        assert_eq!(feed.data.len(), 2);
        assert_eq!(feed.data[0].id, alert.id);
        assert!(feed.data[0].simulated);
        assert_eq!(feed.data[0].kind, AlertKind::Resource);
        assert_eq!(feed.data[1].id, "live_1");
    }

    #[tokio::test]
    async fn test_feed_merges_with_mock_when_offline() {
        let (api, service) = service();
        service
            .send_alert("Dei-Dei PHC", SimulatedKind::Outbreak)
            .await
            .unwrap();

        api.fail(true);
        let feed = service.alerts_feed(&ApiParams::new()).await;
        assert_eq!(feed.origin, Origin::Mock);
        assert_eq!(feed.data.len(), 1 + fixtures::mock_alerts_feed().len());
        assert!(feed.data[0].simulated);
    }

    #[tokio::test]
    async fn test_send_alert_signals_listeners() {
        let (_, service) = service();
        let mut rx = service.signals().subscribe();

        let alert = service
            .send_alert("dei-dei phc", SimulatedKind::Underserved)
            .await
            .unwrap();
        assert_eq!(alert.facility_id, "phc_900");
        assert_eq!(alert.facility_name, "Dei-Dei PHC");
        assert_eq!(rx.recv().await.unwrap(), AlertSignal::AlertSimulated);

        service.clear_alerts().unwrap();
        assert_eq!(rx.recv().await.unwrap(), AlertSignal::AlertsCleared);
        assert!(service.simulated().load().is_empty());
    }

    #[tokio::test]
    async fn test_send_alert_unknown_facility() {
        let (_, service) = service();
        let err = service
            .send_alert("phc_missing", SimulatedKind::Outbreak)
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::UnknownFacility(id) if id == "phc_missing"));
        assert!(service.simulated().load().is_empty());
    }

    #[tokio::test]
    async fn test_open_feed_hides_resolved() {
        let (_, service) = service();
        assert!(service.resolve("live_1").unwrap());
        assert!(!service.resolve("live_1").unwrap());

        let open = service.open_alerts_feed(&ApiParams::new()).await;
        assert!(open.data.is_empty());

        let all = service.alerts_feed(&ApiParams::new()).await;
        assert_eq!(all.data.len(), 1);
    }

    #[tokio::test]
    async fn test_advice_and_health_propagate_errors() {
        let (api, service) = service();
        let advice = service
            .telecom_advice("Dei-Dei PHC", &ApiParams::new())
            .await
            .unwrap();
        assert_eq!(advice[0].facility_name, "Dei-Dei PHC");
        assert_eq!(service.health().await.unwrap().status, "ok");

        api.fail(true);
        assert!(matches!(
            service.health().await,
            Err(MonitorError::Api(ApiError::Status { status: 503, .. }))
        ));
    }

    #[test]
    fn test_fetched_serializes_origin() {
        let fetched = Fetched::live(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&fetched).unwrap(),
            json!({"data": [1, 2], "origin": "live"})
        );
    }
}
