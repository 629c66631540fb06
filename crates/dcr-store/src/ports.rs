//! Port trait for the remote document store.
//!
//! The remote collection holds one document per report, keyed by id, and
//! is the preferred source of truth whenever it is reachable. The core
//! does not implement the remote store's internal consistency; it assumes
//! strongly consistent per-document read-after-write.

use async_trait::async_trait;
use dcr_core::error::Result;
use dcr_core::models::Report;

/// Fields the remote collection can be queried on by equality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    Region,
    Province,
    Status,
    InterventionType,
    CreatedBy,
}

impl QueryField {
    /// Wire name of the field, matching the serialized report attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryField::Region => "region",
            QueryField::Province => "province",
            QueryField::Status => "status",
            QueryField::InterventionType => "intervention_type",
            QueryField::CreatedBy => "created_by",
        }
    }
}

/// Port for the remote record store.
///
/// Every operation may fail with [`dcr_core::DcrError::RemoteUnavailable`];
/// the synchronization layer treats that as recoverable and falls back to
/// the local store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Create or overwrite the document for a report
    async fn save(&self, report: &Report) -> Result<()>;

    /// Fetch one document by id
    async fn get(&self, id: &str) -> Result<Option<Report>>;

    /// Fetch the whole collection
    async fn get_all(&self) -> Result<Vec<Report>>;

    /// Fetch documents matching one field by equality
    async fn get_by_field(&self, field: QueryField, value: &str) -> Result<Vec<Report>>;

    /// Replace the document for an existing report
    async fn update(&self, id: &str, report: &Report) -> Result<()>;

    /// Delete one document; false when the id was unknown
    async fn delete(&self, id: &str) -> Result<bool>;
}
