//! Conversion of the legacy flat-list payload into current records.
//!
//! The first deployment persisted reports as one flat JSON array with
//! Spanish field names and no identifier scheme. The local store imports
//! that payload exactly once (see [`crate::local::LocalStore::import_legacy`]);
//! this module holds the wire shape and the per-entry conversion.

use chrono::{DateTime, Utc};
use dcr_core::error::{DcrError, Result};
use dcr_core::ident;
use dcr_core::models::{MediaRefs, Report, ReportStatus};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One entry of the legacy flat-list payload. Every field is optional;
/// the old client wrote whatever the form had filled in.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyReport {
    #[serde(default, rename = "reportNumber")]
    pub report_number: Option<String>,

    #[serde(default)]
    pub fecha: Option<String>,

    #[serde(default, rename = "usuarioId")]
    pub usuario_id: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub provincia: Option<String>,

    #[serde(default)]
    pub municipio: Option<String>,

    #[serde(default)]
    pub distrito: Option<String>,

    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default, rename = "tipoIntervencion")]
    pub tipo_intervencion: Option<String>,

    #[serde(default)]
    pub observaciones: Option<String>,

    #[serde(default)]
    pub metricas: BTreeMap<String, String>,

    #[serde(default)]
    pub estado: Option<String>,
}

/// Parse the raw legacy payload (a JSON array of flat entries)
pub fn parse_legacy_payload(raw: &str) -> Result<Vec<LegacyReport>> {
    serde_json::from_str(raw).map_err(|e| DcrError::LegacyImport {
        reason: format!("Payload is not a legacy report list: {e}"),
    })
}

impl LegacyReport {
    /// Convert into a current record under the given report number.
    ///
    /// Status defaults to completed: the old client only persisted reports
    /// after the work was done.
    pub fn into_report(self, report_number: String, now: DateTime<Utc>) -> Report {
        let created_at = self
            .fecha
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        let status = self
            .estado
            .as_deref()
            .and_then(ReportStatus::parse)
            .unwrap_or(ReportStatus::Completed);

        Report {
            id: ident::encode(&report_number),
            report_number,
            created_at,
            modified_at: None,
            created_by: self.usuario_id.unwrap_or_else(|| "legacy".to_string()),
            modified_by: None,
            region: self.region.unwrap_or_default(),
            province: self.provincia.unwrap_or_default(),
            municipality: self.municipio.unwrap_or_default(),
            district: self.distrito.unwrap_or_default(),
            sector: self.sector.unwrap_or_default(),
            intervention_type: self.tipo_intervencion.unwrap_or_default(),
            intervention_subtype: None,
            observations: self.observaciones,
            metrics: self.metricas,
            gps: None,
            media: MediaRefs::default(),
            generated_files: BTreeMap::new(),
            status,
            version: 1,
            tags: Vec::new(),
            categories: Vec::new(),
        }
    }
}
