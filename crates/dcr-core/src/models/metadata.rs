use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current layout version of the local store.
///
/// Version 1 was the legacy flat-list format; its one-time import is the
/// only migration the store performs.
pub const STORE_SCHEMA_VERSION: u32 = 2;

/// Store-level bookkeeping persisted alongside records and index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Layout version of the persisted store
    pub version: u32,

    pub created_at: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,

    pub total_reports: u64,

    /// Counter behind the report-number generator; the numeric suffix of
    /// the last number handed out
    pub last_report_number: u32,
}

impl StoreMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: STORE_SCHEMA_VERSION,
            created_at: now,
            last_modified: now,
            total_reports: 0,
            last_report_number: 0,
        }
    }
}
