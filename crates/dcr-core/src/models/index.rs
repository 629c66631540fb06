use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::report::{Report, ReportStatus};

/// Lightweight projection of a [`Report`] for listing and preview.
///
/// Index entries are maintained in lock-step with the full record store: a
/// completed write never leaves an entry without a backing record or a
/// record without an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportIndex {
    pub id: String,

    pub report_number: String,

    /// Last activity (modification if any, else creation)
    pub timestamp: DateTime<Utc>,

    pub created_by: String,

    pub region: String,

    pub province: String,

    pub municipality: String,

    pub intervention_type: String,

    pub status: ReportStatus,
}

impl From<&Report> for ReportIndex {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            report_number: report.report_number.clone(),
            timestamp: report.activity_at(),
            created_by: report.created_by.clone(),
            region: report.region.clone(),
            province: report.province.clone(),
            municipality: report.municipality.clone(),
            intervention_type: report.intervention_type.clone(),
            status: report.status,
        }
    }
}
