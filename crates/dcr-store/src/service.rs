//! Report service: single mutation entry point applying the
//! remote-first / local-fallback policy.
//!
//! Reads attempt the remote store once and fall back to the local store on
//! failure; no retries, no backoff. Writes are a two-step saga: the remote
//! step runs first, the local step always runs, and the two outcomes are
//! reported independently instead of pretending atomicity. A remote
//! failure never blocks local persistence; the stores reconverge on the
//! next successful remote read-all, and the divergence window is surfaced
//! through warnings and [`RemoteOutcome`].

use chrono::Utc;
use dcr_core::error::{DcrError, Result};
use dcr_core::ident;
use dcr_core::models::{
    ExportKind, GeneratedFile, GpsTrack, MediaRefs, Report, ReportFilter, ReportIndex,
    ReportStatus, StoreMetadata,
};
use dcr_core::ports::DocumentExporter;
use dcr_core::stats::{self, ReportStatistics};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::local::LocalStore;
use crate::ports::RemoteStore;

/// Outcome of the remote step of a write saga
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// Remote accepted the write
    Applied,
    /// Remote was attempted and failed; the local copy stands alone until
    /// the next reconciliation
    Failed(String),
    /// No remote store is configured (offline deployment)
    Skipped,
}

impl RemoteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RemoteOutcome::Applied)
    }
}

/// Result of a create or update
#[derive(Debug, Clone)]
pub struct SaveReceipt {
    pub report: Report,
    pub remote: RemoteOutcome,
}

/// Result of a delete; both steps are best-effort
#[derive(Debug, Clone)]
pub struct DeleteReceipt {
    pub local_removed: bool,
    pub remote: RemoteOutcome,
}

impl DeleteReceipt {
    /// Whether any copy of the record was actually removed
    pub fn removed(&self) -> bool {
        self.local_removed || self.remote.is_applied()
    }
}

/// Result of a document export
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub report: Report,
    pub pointer: GeneratedFile,
    pub bytes: Vec<u8>,
    pub remote: RemoteOutcome,
}

/// Input for creating a report; the service assigns identifiers,
/// timestamps, and the initial version
#[derive(Debug, Clone, Default)]
pub struct NewReport {
    pub created_by: String,
    pub region: String,
    pub province: String,
    pub municipality: String,
    pub district: String,
    pub sector: String,
    pub intervention_type: String,
    pub intervention_subtype: Option<String>,
    pub observations: Option<String>,
    pub metrics: BTreeMap<String, String>,
    pub gps: Option<GpsTrack>,
    pub media: MediaRefs,
    /// Defaults to pending when absent
    pub status: Option<ReportStatus>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

/// Partial update; absent fields stay unchanged
#[derive(Debug, Clone, Default)]
pub struct ReportChanges {
    pub status: Option<ReportStatus>,
    pub observations: Option<String>,
    pub metrics: Option<BTreeMap<String, String>>,
    pub gps: Option<GpsTrack>,
    pub media: Option<MediaRefs>,
    pub intervention_subtype: Option<String>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

/// The single entry point for report mutation and policy-aware reads
pub struct ReportService {
    local: Arc<LocalStore>,
    remote: Option<Arc<dyn RemoteStore>>,
    exporter: Option<Arc<dyn DocumentExporter>>,
}

impl ReportService {
    /// Offline-only service over a local store
    pub fn new(local: Arc<LocalStore>) -> Self {
        Self {
            local,
            remote: None,
            exporter: None,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn DocumentExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    /// Create a report: validate, assign number/id, dual-write.
    ///
    /// Validation failures reach neither store and do not consume a
    /// report number.
    pub async fn create_report(&self, draft: NewReport) -> Result<SaveReceipt> {
        validate_draft(&draft)?;

        let report_number = self.local.next_report_number()?;
        let report = Report {
            id: ident::encode(&report_number),
            report_number,
            created_at: Utc::now(),
            modified_at: None,
            created_by: draft.created_by,
            modified_by: None,
            region: draft.region,
            province: draft.province,
            municipality: draft.municipality,
            district: draft.district,
            sector: draft.sector,
            intervention_type: draft.intervention_type,
            intervention_subtype: draft.intervention_subtype,
            observations: draft.observations,
            metrics: draft.metrics,
            gps: draft.gps,
            media: draft.media,
            generated_files: BTreeMap::new(),
            status: draft.status.unwrap_or(ReportStatus::Pending),
            version: 1,
            tags: draft.tags,
            categories: draft.categories,
        };

        let remote = self.remote_save(&report).await;
        self.local.put(report.clone())?;
        Ok(SaveReceipt { report, remote })
    }

    /// Update an existing report: bump version, stamp modification,
    /// dual-write. Last writer wins; there is no conflict detection.
    pub async fn update_report(
        &self,
        id: &str,
        changes: ReportChanges,
        modified_by: &str,
    ) -> Result<SaveReceipt> {
        let mut report = self
            .get_report(id)
            .await?
            .ok_or_else(|| DcrError::ReportNotFound { id: id.to_string() })?;

        if let Some(status) = changes.status {
            report.status = status;
        }
        if let Some(observations) = changes.observations {
            report.observations = Some(observations);
        }
        if let Some(metrics) = changes.metrics {
            report.metrics = metrics;
        }
        if let Some(gps) = changes.gps {
            report.gps = Some(gps);
        }
        if let Some(media) = changes.media {
            report.media = media;
        }
        if let Some(subtype) = changes.intervention_subtype {
            report.intervention_subtype = Some(subtype);
        }
        if let Some(tags) = changes.tags {
            report.tags = tags;
        }
        if let Some(categories) = changes.categories {
            report.categories = categories;
        }

        if modified_by.trim().is_empty() {
            return Err(DcrError::Validation {
                field: "modified_by".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(gps) = &report.gps {
            validate_gps(gps)?;
        }

        report.version += 1;
        report.modified_at = Some(Utc::now());
        report.modified_by = Some(modified_by.to_string());

        let remote = self.remote_update(&report).await;
        self.local.put(report.clone())?;
        Ok(SaveReceipt { report, remote })
    }

    /// Fetch one report, remote first, local on failure
    pub async fn get_report(&self, id: &str) -> Result<Option<Report>> {
        match &self.remote {
            Some(remote) => match remote.get(id).await {
                Ok(report) => Ok(report),
                Err(e) => {
                    tracing::warn!(id, "Remote read failed, serving local record: {e}");
                    Ok(self.local.get(id))
                }
            },
            None => Ok(self.local.get(id)),
        }
    }

    /// Fetch a report by its human-readable number
    pub async fn get_by_number(&self, report_number: &str) -> Result<Option<Report>> {
        self.get_report(&ident::encode(report_number)).await
    }

    /// Fetch all reports. A successful remote read is used exclusively and
    /// mirrored into the local store for the next offline window; on
    /// failure the local store serves the call.
    pub async fn get_all_reports(&self) -> Result<Vec<Report>> {
        match &self.remote {
            Some(remote) => match remote.get_all().await {
                Ok(mut reports) => {
                    self.local.mirror(&reports)?;
                    reports.sort_by(|a, b| {
                        (b.activity_at(), &b.report_number).cmp(&(a.activity_at(), &a.report_number))
                    });
                    Ok(reports)
                }
                Err(e) => {
                    tracing::warn!("Remote read failed, serving local records: {e}");
                    Ok(self.local.get_all())
                }
            },
            None => Ok(self.local.get_all()),
        }
    }

    /// Delete a report from both stores, best effort each.
    ///
    /// Deleting an unknown id reports `removed() == false` and is not an
    /// error. If one side succeeds and the other fails there is no
    /// compensating action; the inconsistency window is accepted and
    /// visible in the receipt.
    pub async fn delete_report(&self, id: &str) -> Result<DeleteReceipt> {
        let remote = match &self.remote {
            Some(remote) => match remote.delete(id).await {
                Ok(true) => RemoteOutcome::Applied,
                Ok(false) => RemoteOutcome::Failed("not found on remote".to_string()),
                Err(e) => {
                    tracing::warn!(id, "Remote delete failed: {e}");
                    RemoteOutcome::Failed(e.to_string())
                }
            },
            None => RemoteOutcome::Skipped,
        };

        let local_removed = self.local.delete(id)?;
        Ok(DeleteReceipt { local_removed, remote })
    }

    /// Search the local store with the filter conjunction
    pub fn search(&self, filter: &ReportFilter) -> Vec<Report> {
        self.local.search(filter)
    }

    /// Cheap preview by report number via the secondary index
    pub fn preview_by_number(&self, report_number: &str) -> Option<ReportIndex> {
        self.local.preview_by_number(report_number)
    }

    /// Snapshot of the secondary index
    pub fn index(&self) -> Vec<ReportIndex> {
        self.local.index_snapshot()
    }

    /// Local store bookkeeping
    pub fn metadata(&self) -> StoreMetadata {
        self.local.metadata()
    }

    /// Aggregate statistics over the policy-resolved snapshot
    pub async fn statistics(&self) -> Result<ReportStatistics> {
        let reports = self.get_all_reports().await?;
        Ok(stats::aggregate(&reports))
    }

    /// Render a report into a document and attach the blob pointer.
    ///
    /// The record carries only the pointer (filename, content hash, size);
    /// the returned bytes are the caller's to place in the blob area. An
    /// exporter failure surfaces as an error without touching the record,
    /// so a save that preceded it stands.
    pub async fn export_report(&self, id: &str, kind: ExportKind) -> Result<ExportReceipt> {
        let exporter = self.exporter.as_ref().ok_or_else(|| DcrError::ExportFailed {
            kind: kind.to_string(),
            reason: "no document exporter configured".to_string(),
        })?;

        let mut report = self
            .get_report(id)
            .await?
            .ok_or_else(|| DcrError::ReportNotFound { id: id.to_string() })?;

        let bytes = exporter.generate(&report, kind)?;
        let pointer = GeneratedFile {
            filename: format!("{}.{}", report.report_number, kind.extension()),
            content_hash: hex::encode(Sha256::digest(&bytes)),
            size_bytes: bytes.len() as u64,
            generated_at: Utc::now(),
        };

        report.generated_files.insert(kind, pointer.clone());
        report.version += 1;
        report.modified_at = Some(Utc::now());

        let remote = self.remote_update(&report).await;
        self.local.put(report.clone())?;

        Ok(ExportReceipt {
            report,
            pointer,
            bytes,
            remote,
        })
    }

    async fn remote_save(&self, report: &Report) -> RemoteOutcome {
        match &self.remote {
            Some(remote) => match remote.save(report).await {
                Ok(()) => RemoteOutcome::Applied,
                Err(e) => {
                    tracing::warn!(
                        report = %report.report_number,
                        "Remote write failed, keeping local copy: {e}"
                    );
                    RemoteOutcome::Failed(e.to_string())
                }
            },
            None => RemoteOutcome::Skipped,
        }
    }

    async fn remote_update(&self, report: &Report) -> RemoteOutcome {
        match &self.remote {
            Some(remote) => match remote.update(&report.id, report).await {
                Ok(()) => RemoteOutcome::Applied,
                Err(e) => {
                    tracing::warn!(
                        report = %report.report_number,
                        "Remote update failed, keeping local copy: {e}"
                    );
                    RemoteOutcome::Failed(e.to_string())
                }
            },
            None => RemoteOutcome::Skipped,
        }
    }
}

fn validate_draft(draft: &NewReport) -> Result<()> {
    require_nonempty("created_by", &draft.created_by)?;
    require_nonempty("region", &draft.region)?;
    require_nonempty("intervention_type", &draft.intervention_type)?;

    for key in draft.metrics.keys() {
        if key.trim().is_empty() {
            return Err(DcrError::Validation {
                field: "metrics".to_string(),
                reason: "metric keys must not be empty".to_string(),
            });
        }
    }

    if let Some(gps) = &draft.gps {
        validate_gps(gps)?;
    }

    Ok(())
}

fn require_nonempty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DcrError::Validation {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_gps(gps: &GpsTrack) -> Result<()> {
    for point in [gps.start, gps.end].into_iter().flatten() {
        if !(-90.0..=90.0).contains(&point.lat) {
            return Err(DcrError::Validation {
                field: "gps".to_string(),
                reason: format!("latitude {} out of range", point.lat),
            });
        }
        if !(-180.0..=180.0).contains(&point.lon) {
            return Err(DcrError::Validation {
                field: "gps".to_string(),
                reason: format!("longitude {} out of range", point.lon),
            });
        }
    }
    Ok(())
}
