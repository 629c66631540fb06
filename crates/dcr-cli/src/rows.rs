//! Table row shapes for listing output.

use dcr_core::models::{Report, ReportIndex};
use serde::Serialize;
use tabled::Tabled;

/// One listing row, fed either from the index or from full records
#[derive(Debug, Serialize, Tabled)]
pub struct ReportRow {
    #[tabled(rename = "Number")]
    pub number: String,

    #[tabled(rename = "Date")]
    pub date: String,

    #[tabled(rename = "Region")]
    pub region: String,

    #[tabled(rename = "Municipality")]
    pub municipality: String,

    #[tabled(rename = "Type")]
    pub intervention_type: String,

    #[tabled(rename = "Status")]
    pub status: String,

    #[tabled(rename = "By")]
    pub created_by: String,
}

impl From<&ReportIndex> for ReportRow {
    fn from(entry: &ReportIndex) -> Self {
        Self {
            number: entry.report_number.clone(),
            date: entry.timestamp.format("%Y-%m-%d").to_string(),
            region: entry.region.clone(),
            municipality: entry.municipality.clone(),
            intervention_type: entry.intervention_type.clone(),
            status: entry.status.to_string(),
            created_by: entry.created_by.clone(),
        }
    }
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self::from(&ReportIndex::from(report))
    }
}

/// One per-region statistics row
#[derive(Debug, Serialize, Tabled)]
pub struct RegionRow {
    #[tabled(rename = "Region")]
    pub region: String,

    #[tabled(rename = "Total")]
    pub total: u64,

    #[tabled(rename = "Completed")]
    pub completed: u64,

    #[tabled(rename = "Pending")]
    pub pending: u64,

    #[tabled(rename = "In progress")]
    pub in_progress: u64,

    #[tabled(rename = "Distance (km)")]
    pub distance_km: String,
}
