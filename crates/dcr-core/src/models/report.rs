use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::location::GpsTrack;

/// Closed set of report lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Completed,
    Pending,
    Draft,
    InReview,
    Approved,
    Rejected,
}

impl ReportStatus {
    /// Stable string form, matching the serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Completed => "completed",
            ReportStatus::Pending => "pending",
            ReportStatus::Draft => "draft",
            ReportStatus::InReview => "in_review",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
        }
    }

    /// Parse the serialized form back into a status
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "completed" | "completado" => Some(ReportStatus::Completed),
            "pending" | "pendiente" => Some(ReportStatus::Pending),
            "draft" | "borrador" => Some(ReportStatus::Draft),
            "in_review" | "en_revision" => Some(ReportStatus::InReview),
            "approved" | "aprobado" => Some(ReportStatus::Approved),
            "rejected" | "rechazado" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export format kinds for generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Pdf,
    Excel,
    Word,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Excel => "excel",
            ExportKind::Word => "word",
        }
    }

    /// File extension for the generated document
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Excel => "xlsx",
            ExportKind::Word => "docx",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer to a generated document in the blob area.
///
/// The record only carries the pointer; document bytes live outside the
/// record store, keyed by report id and kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub filename: String,

    /// Hex-encoded SHA-256 of the document bytes
    pub content_hash: String,

    pub size_bytes: u64,

    pub generated_at: DateTime<Utc>,
}

/// Media attachments referenced by opaque strings (URLs or data URIs)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRefs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
}

impl MediaRefs {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty() && self.documents.is_empty()
    }
}

/// One recorded road-maintenance intervention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Opaque storage key, derived from `report_number`. Immutable.
    pub id: String,

    /// Human-readable identifier, `DCR-<year>-<6-digit sequence>`. Immutable.
    pub report_number: String,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,

    pub created_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,

    // Location is free text; no referential integrity against a geography table
    pub region: String,

    #[serde(default)]
    pub province: String,

    #[serde(default)]
    pub municipality: String,

    #[serde(default)]
    pub district: String,

    #[serde(default)]
    pub sector: String,

    pub intervention_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention_subtype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,

    /// Open metric mapping; values stay strings, interpretation is
    /// presentational (see the metric registry)
    #[serde(default)]
    pub metrics: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsTrack>,

    #[serde(default, skip_serializing_if = "MediaRefs::is_empty")]
    pub media: MediaRefs,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub generated_files: BTreeMap<ExportKind, GeneratedFile>,

    pub status: ReportStatus,

    /// Starts at 1, incremented by exactly 1 per successful update
    pub version: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl Report {
    /// Timestamp used for presentation ordering (most recent activity first)
    pub fn activity_at(&self) -> DateTime<Utc> {
        self.modified_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::GeoPoint;

    fn sample_report() -> Report {
        Report {
            id: "dcr_abc".to_string(),
            report_number: "DCR-2026-000001".to_string(),
            created_at: Utc::now(),
            modified_at: None,
            created_by: "jperez".to_string(),
            modified_by: None,
            region: "Cibao Norte".to_string(),
            province: "Santiago".to_string(),
            municipality: "Santiago de los Caballeros".to_string(),
            district: String::new(),
            sector: String::new(),
            intervention_type: "Bacheo".to_string(),
            intervention_subtype: None,
            observations: None,
            metrics: BTreeMap::new(),
            gps: Some(GpsTrack::new(
                GeoPoint::new(19.45, -70.69),
                GeoPoint::new(19.46, -70.70),
            )),
            media: MediaRefs::default(),
            generated_files: BTreeMap::new(),
            status: ReportStatus::Pending,
            version: 1,
            tags: Vec::new(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ReportStatus::InReview).unwrap();
        assert_eq!(json, "\"in_review\"");
        let back: ReportStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(back, ReportStatus::Approved);
    }

    #[test]
    fn test_status_parse_accepts_legacy_spanish() {
        assert_eq!(ReportStatus::parse("completado"), Some(ReportStatus::Completed));
        assert_eq!(ReportStatus::parse("EN_REVISION"), Some(ReportStatus::InReview));
        assert_eq!(ReportStatus::parse("unknown"), None);
    }

    #[test]
    fn test_report_roundtrip_preserves_metric_strings() {
        let mut report = sample_report();
        report.metrics.insert("length".to_string(), "120".to_string());
        report.metrics.insert("area".to_string(), "340.5".to_string());

        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(back.metrics["length"], "120");
        assert_eq!(back.metrics["area"], "340.5");
        assert_eq!(back, report);
    }

    #[test]
    fn test_generated_files_keyed_by_kind() {
        let mut report = sample_report();
        report.generated_files.insert(
            ExportKind::Word,
            GeneratedFile {
                filename: "DCR-2026-000001.docx".to_string(),
                content_hash: "deadbeef".to_string(),
                size_bytes: 1024,
                generated_at: Utc::now(),
            },
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"word\""));
        let back: Report = serde_json::from_str(&json).unwrap();
        assert!(back.generated_files.contains_key(&ExportKind::Word));
    }

    #[test]
    fn test_activity_falls_back_to_creation() {
        let mut report = sample_report();
        assert_eq!(report.activity_at(), report.created_at);

        let later = report.created_at + chrono::Duration::hours(2);
        report.modified_at = Some(later);
        assert_eq!(report.activity_at(), later);
    }
}
