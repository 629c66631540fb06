//! Remote store adapters: a JSON REST client for deployments and an
//! in-memory double for development and testing.
//!
//! The in-memory adapter uses `RwLock::unwrap()` intentionally. Lock
//! poisoning only occurs when another thread panicked while holding the
//! lock, which is an unrecoverable state.

use async_trait::async_trait;
use dcr_core::error::{DcrError, Result};
use dcr_core::models::Report;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::ports::{QueryField, RemoteStore};

/// JSON REST adapter for the remote report collection.
///
/// Expects a document API under the base URL: `GET/POST /reports`,
/// `GET/PUT/DELETE /reports/{id}`, and equality queries via
/// `GET /reports?<field>=<value>`.
pub struct HttpRemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    /// Create an adapter against the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DcrError::RemoteUnavailable {
                reason: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn reports_url(&self) -> String {
        format!("{}/reports", self.base_url)
    }

    fn report_url(&self, id: &str) -> String {
        format!("{}/reports/{id}", self.base_url)
    }
}

fn connectivity(context: &str, e: reqwest::Error) -> DcrError {
    DcrError::RemoteUnavailable {
        reason: format!("{context}: {e}"),
    }
}

fn status_error(context: &str, status: reqwest::StatusCode) -> DcrError {
    DcrError::RemoteUnavailable {
        reason: format!("{context}: remote answered {status}"),
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn save(&self, report: &Report) -> Result<()> {
        let response = self
            .client
            .post(self.reports_url())
            .json(report)
            .send()
            .await
            .map_err(|e| connectivity("save", e))?;

        if !response.status().is_success() {
            return Err(status_error("save", response.status()));
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Report>> {
        let response = self
            .client
            .get(self.report_url(id))
            .send()
            .await
            .map_err(|e| connectivity("get", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error("get", response.status()));
        }

        let report = response.json().await.map_err(|e| connectivity("get", e))?;
        Ok(Some(report))
    }

    async fn get_all(&self) -> Result<Vec<Report>> {
        let response = self
            .client
            .get(self.reports_url())
            .send()
            .await
            .map_err(|e| connectivity("get_all", e))?;

        if !response.status().is_success() {
            return Err(status_error("get_all", response.status()));
        }

        response.json().await.map_err(|e| connectivity("get_all", e))
    }

    async fn get_by_field(&self, field: QueryField, value: &str) -> Result<Vec<Report>> {
        let response = self
            .client
            .get(self.reports_url())
            .query(&[(field.as_str(), value)])
            .send()
            .await
            .map_err(|e| connectivity("get_by_field", e))?;

        if !response.status().is_success() {
            return Err(status_error("get_by_field", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| connectivity("get_by_field", e))
    }

    async fn update(&self, id: &str, report: &Report) -> Result<()> {
        let response = self
            .client
            .put(self.report_url(id))
            .json(report)
            .send()
            .await
            .map_err(|e| connectivity("update", e))?;

        if !response.status().is_success() {
            return Err(status_error("update", response.status()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let response = self
            .client
            .delete(self.report_url(id))
            .send()
            .await
            .map_err(|e| connectivity("delete", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(status_error("delete", response.status()));
        }
        Ok(true)
    }
}

/// In-memory remote store for development and testing.
///
/// The failure switch makes every operation answer with a connectivity
/// error, which is how fallback behavior is exercised in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemoteStore {
    documents: Arc<RwLock<HashMap<String, Report>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle connectivity-failure injection
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_reachable(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DcrError::RemoteUnavailable {
                reason: "injected connectivity failure".to_string(),
            });
        }
        Ok(())
    }

    fn field_matches(report: &Report, field: QueryField, value: &str) -> bool {
        match field {
            QueryField::Region => report.region == value,
            QueryField::Province => report.province == value,
            QueryField::Status => report.status.as_str() == value,
            QueryField::InterventionType => report.intervention_type == value,
            QueryField::CreatedBy => report.created_by == value,
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn save(&self, report: &Report) -> Result<()> {
        self.check_reachable()?;
        let mut documents = self.documents.write().unwrap();
        documents.insert(report.id.clone(), report.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Report>> {
        self.check_reachable()?;
        let documents = self.documents.read().unwrap();
        Ok(documents.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Report>> {
        self.check_reachable()?;
        let documents = self.documents.read().unwrap();
        Ok(documents.values().cloned().collect())
    }

    async fn get_by_field(&self, field: QueryField, value: &str) -> Result<Vec<Report>> {
        self.check_reachable()?;
        let documents = self.documents.read().unwrap();
        Ok(documents
            .values()
            .filter(|report| Self::field_matches(report, field, value))
            .cloned()
            .collect())
    }

    async fn update(&self, id: &str, report: &Report) -> Result<()> {
        self.check_reachable()?;
        let mut documents = self.documents.write().unwrap();
        documents.insert(id.to_string(), report.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.check_reachable()?;
        let mut documents = self.documents.write().unwrap();
        Ok(documents.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dcr_core::ident;
    use dcr_core::models::{MediaRefs, ReportStatus};
    use std::collections::BTreeMap;

    fn sample(number: &str, region: &str, status: ReportStatus) -> Report {
        Report {
            id: ident::encode(number),
            report_number: number.to_string(),
            created_at: Utc::now(),
            modified_at: None,
            created_by: "jperez".to_string(),
            modified_by: None,
            region: region.to_string(),
            province: "Santiago".to_string(),
            municipality: String::new(),
            district: String::new(),
            sector: String::new(),
            intervention_type: "Bacheo".to_string(),
            intervention_subtype: None,
            observations: None,
            metrics: BTreeMap::new(),
            gps: None,
            media: MediaRefs::default(),
            generated_files: BTreeMap::new(),
            status,
            version: 1,
            tags: Vec::new(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_http_store_url_layout() {
        let store =
            HttpRemoteStore::new("https://reports.example.do/api/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(store.reports_url(), "https://reports.example.do/api/reports");
        assert_eq!(
            store.report_url("dcr_abc"),
            "https://reports.example.do/api/reports/dcr_abc"
        );
    }

    #[tokio::test]
    async fn test_memory_remote_crud() {
        let remote = MemoryRemoteStore::new();
        let report = sample("DCR-2026-000001", "Cibao Norte", ReportStatus::Pending);

        remote.save(&report).await.unwrap();
        assert_eq!(remote.get(&report.id).await.unwrap(), Some(report.clone()));

        let mut updated = report.clone();
        updated.status = ReportStatus::Approved;
        updated.version = 2;
        remote.update(&report.id, &updated).await.unwrap();
        assert_eq!(remote.get(&report.id).await.unwrap().unwrap().version, 2);

        assert!(remote.delete(&report.id).await.unwrap());
        assert!(!remote.delete(&report.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_remote_query_by_field() {
        let remote = MemoryRemoteStore::new();
        remote
            .save(&sample("DCR-2026-000001", "Cibao Norte", ReportStatus::Pending))
            .await
            .unwrap();
        remote
            .save(&sample("DCR-2026-000002", "Yuma", ReportStatus::Completed))
            .await
            .unwrap();

        let by_region = remote.get_by_field(QueryField::Region, "Yuma").await.unwrap();
        assert_eq!(by_region.len(), 1);
        assert_eq!(by_region[0].report_number, "DCR-2026-000002");

        let by_status = remote
            .get_by_field(QueryField::Status, "pending")
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);

        let by_user = remote
            .get_by_field(QueryField::CreatedBy, "nobody")
            .await
            .unwrap();
        assert!(by_user.is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let remote = MemoryRemoteStore::new();
        remote.set_failing(true);

        let report = sample("DCR-2026-000001", "Ozama", ReportStatus::Draft);
        assert!(matches!(
            remote.save(&report).await,
            Err(DcrError::RemoteUnavailable { .. })
        ));
        assert!(remote.get_all().await.is_err());

        remote.set_failing(false);
        remote.save(&report).await.unwrap();
        assert_eq!(remote.len(), 1);
    }
}
