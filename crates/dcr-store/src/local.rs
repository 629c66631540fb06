//! Local record store: authoritative-when-offline persistence of reports,
//! the secondary index, and store metadata.
//!
//! All three live under fixed keys of a [`KvBackend`] namespace and are
//! mutated inside one critical section, so a reader never observes an
//! index entry without its backing record or the reverse. Corrupt JSON
//! under any key is treated as an empty value at this boundary and logged,
//! never propagated as a crash.

use chrono::{DateTime, Datelike, Utc};
use dcr_core::error::{DcrError, Result};
use dcr_core::ident;
use dcr_core::models::{Report, ReportFilter, ReportIndex, StoreMetadata};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::kv::KvBackend;
use crate::legacy;

/// Full-record store: mapping id -> Report
pub const REPORTS_KEY: &str = "dcr.reports";

/// Secondary index: ordered list of projections
pub const INDEX_KEY: &str = "dcr.index";

/// Store metadata: counters and timestamps
pub const META_KEY: &str = "dcr.meta";

/// Flat-list payload written by the legacy client, if any
pub const LEGACY_KEY: &str = "dcr.legacy";

/// Backup copy of the legacy payload, written once on import and never
/// deleted automatically
pub const LEGACY_BACKUP_KEY: &str = "dcr.legacy_backup";

struct StoreState {
    reports: BTreeMap<String, Report>,
    index: Vec<ReportIndex>,
    meta: StoreMetadata,
}

/// Whole-database snapshot for export/import.
///
/// Importing replaces all three logical keys wholesale; there is no merge.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseExport {
    pub reports: BTreeMap<String, Report>,
    pub index: Vec<ReportIndex>,
    pub metadata: StoreMetadata,
    pub exported_at: DateTime<Utc>,
}

/// Local persistence of full reports keyed by id.
///
/// Reads are served from memory and are infallible; mutations persist
/// write-through to the backend before returning. Single logical writer
/// per store instance is assumed (one interactive session), matching the
/// report-number generator's contract.
pub struct LocalStore {
    kv: Arc<dyn KvBackend>,
    state: RwLock<StoreState>,
    fresh: AtomicBool,
}

impl LocalStore {
    /// Open the store over a backend, loading any persisted state.
    ///
    /// Opening performs no writes: a store is "fresh" until its first
    /// mutation persists metadata, and only a fresh store will accept a
    /// legacy import.
    pub fn open(kv: Arc<dyn KvBackend>) -> Result<Self> {
        let reports: BTreeMap<String, Report> =
            read_key(kv.as_ref(), REPORTS_KEY)?.unwrap_or_default();
        let index: Vec<ReportIndex> = read_key(kv.as_ref(), INDEX_KEY)?.unwrap_or_default();
        let meta: Option<StoreMetadata> = read_key(kv.as_ref(), META_KEY)?;

        let fresh = meta.is_none();
        let meta = meta.unwrap_or_else(|| StoreMetadata::new(Utc::now()));

        tracing::debug!(
            records = reports.len(),
            fresh,
            "Opened local report store"
        );

        Ok(Self {
            kv,
            state: RwLock::new(StoreState { reports, index, meta }),
            fresh: AtomicBool::new(fresh),
        })
    }

    /// True until the first mutation is persisted
    pub fn is_fresh(&self) -> bool {
        self.fresh.load(Ordering::SeqCst)
    }

    /// Upsert a full record and its index entry
    pub fn put(&self, report: Report) -> Result<Report> {
        let mut state = self.state.write().unwrap();
        apply_put(&mut state, &report);
        self.persist(&state)?;
        Ok(report)
    }

    /// Upsert a batch in one critical section and one persist pass.
    ///
    /// Used to mirror a successful remote read-all for the next offline
    /// window.
    pub fn mirror(&self, reports: &[Report]) -> Result<()> {
        if reports.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().unwrap();
        for report in reports {
            apply_put(&mut state, report);
        }
        self.persist(&state)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Report> {
        let state = self.state.read().unwrap();
        state.reports.get(id).cloned()
    }

    /// All records, most recent activity first.
    ///
    /// Ordering is a presentation convenience: descending by modification
    /// (or creation) time, ties broken by report number descending so the
    /// order is stable.
    pub fn get_all(&self) -> Vec<Report> {
        let state = self.state.read().unwrap();
        let mut reports: Vec<Report> = state.reports.values().cloned().collect();
        sort_for_listing(&mut reports);
        reports
    }

    /// Remove a record and its index entry.
    ///
    /// Returns false when the id is unknown; that is not an error and
    /// leaves the store untouched.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write().unwrap();
        if state.reports.remove(id).is_none() {
            return Ok(false);
        }
        state.index.retain(|entry| entry.id != id);
        state.meta.total_reports = state.reports.len() as u64;
        state.meta.last_modified = Utc::now();
        self.persist(&state)?;
        Ok(true)
    }

    /// Records matching the filter conjunction, listing order
    pub fn search(&self, filter: &ReportFilter) -> Vec<Report> {
        let state = self.state.read().unwrap();
        let mut matches: Vec<Report> = state
            .reports
            .values()
            .filter(|report| filter.matches(report))
            .cloned()
            .collect();
        sort_for_listing(&mut matches);
        matches
    }

    /// Cheap preview by report number: the index is scanned first, then a
    /// full-record lookup covers records written before indexing existed.
    pub fn preview_by_number(&self, report_number: &str) -> Option<ReportIndex> {
        let state = self.state.read().unwrap();
        if let Some(entry) = state.index.iter().find(|e| e.report_number == report_number) {
            return Some(entry.clone());
        }
        let id = ident::encode(report_number);
        state.reports.get(&id).map(ReportIndex::from)
    }

    /// Snapshot of the index, listing order
    pub fn index_snapshot(&self) -> Vec<ReportIndex> {
        let state = self.state.read().unwrap();
        state.index.clone()
    }

    pub fn metadata(&self) -> StoreMetadata {
        let state = self.state.read().unwrap();
        state.meta.clone()
    }

    /// Hand out the next sequential report number.
    ///
    /// The counter is persisted before the number is returned. Not safe
    /// under concurrent writers without an external sequence source; a
    /// single interactive session is assumed.
    pub fn next_report_number(&self) -> Result<String> {
        let mut state = self.state.write().unwrap();
        state.meta.last_report_number += 1;
        state.meta.last_modified = Utc::now();
        let number =
            ident::format_report_number(Utc::now().year(), state.meta.last_report_number);
        self.persist_meta(&state.meta)?;
        self.fresh.store(false, Ordering::SeqCst);
        Ok(number)
    }

    /// One-time import of the legacy flat-list payload.
    ///
    /// Runs only against a store that has never persisted metadata; on any
    /// later call it is a no-op. Each legacy entry goes through the normal
    /// put path (assigning a fresh report number where the entry has
    /// none), and the raw payload is preserved under a backup key that is
    /// never deleted automatically. Returns the number of imported
    /// records.
    pub fn import_legacy(&self) -> Result<usize> {
        if !self.is_fresh() {
            tracing::debug!("Store already initialized, skipping legacy import");
            return Ok(0);
        }

        let Some(raw) = self.kv.get(LEGACY_KEY)? else {
            return Ok(0);
        };

        let entries = legacy::parse_legacy_payload(&raw)?;
        let now = Utc::now();
        let mut imported = 0;

        for entry in entries {
            let number = match entry.report_number.clone() {
                Some(number) if !number.is_empty() => number,
                _ => self.next_report_number()?,
            };
            self.put(entry.into_report(number, now))?;
            imported += 1;
        }

        self.kv.set(LEGACY_BACKUP_KEY, &raw)?;
        self.fresh.store(false, Ordering::SeqCst);
        tracing::info!(imported, "Imported legacy report payload");
        Ok(imported)
    }

    /// Export the whole database as one JSON-serializable document
    pub fn export_database(&self) -> DatabaseExport {
        let state = self.state.read().unwrap();
        DatabaseExport {
            reports: state.reports.clone(),
            index: state.index.clone(),
            metadata: state.meta.clone(),
            exported_at: Utc::now(),
        }
    }

    /// Replace the whole database with an exported document.
    ///
    /// All three keys are replaced wholesale; nothing is merged. Returns
    /// the number of records now in the store.
    pub fn import_database(&self, doc: DatabaseExport) -> Result<usize> {
        let mut state = self.state.write().unwrap();
        state.reports = doc.reports;
        state.index = doc.index;
        state.meta = doc.metadata;
        state.meta.total_reports = state.reports.len() as u64;
        state.meta.last_modified = Utc::now();
        self.persist(&state)?;
        self.fresh.store(false, Ordering::SeqCst);
        Ok(state.reports.len())
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        write_key(self.kv.as_ref(), REPORTS_KEY, &state.reports)?;
        write_key(self.kv.as_ref(), INDEX_KEY, &state.index)?;
        self.persist_meta(&state.meta)?;
        self.fresh.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn persist_meta(&self, meta: &StoreMetadata) -> Result<()> {
        write_key(self.kv.as_ref(), META_KEY, meta)
    }
}

// Record and index entry move together; the index stays in listing order.
fn apply_put(state: &mut StoreState, report: &Report) {
    state.reports.insert(report.id.clone(), report.clone());
    state.index.retain(|entry| entry.id != report.id);
    state.index.push(ReportIndex::from(report));
    state
        .index
        .sort_by(|a, b| (&b.timestamp, &b.report_number).cmp(&(&a.timestamp, &a.report_number)));
    state.meta.total_reports = state.reports.len() as u64;
    state.meta.last_modified = Utc::now();
}

fn sort_for_listing(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        (b.activity_at(), &b.report_number).cmp(&(a.activity_at(), &a.report_number))
    });
}

fn read_key<T: DeserializeOwned>(kv: &dyn KvBackend, key: &str) -> Result<Option<T>> {
    match kv.get(key)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Corrupt JSON under {key}, treating as empty store: {e}");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

fn write_key<T: Serialize>(kv: &dyn KvBackend, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| DcrError::Serialization(e.to_string()))?;
    kv.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileKv, MemoryKv};
    use dcr_core::models::{GeoPoint, GpsTrack, MediaRefs, ReportStatus};

    fn store() -> LocalStore {
        LocalStore::open(Arc::new(MemoryKv::new())).unwrap()
    }

    fn sample(number: &str, region: &str) -> Report {
        Report {
            id: ident::encode(number),
            report_number: number.to_string(),
            created_at: Utc::now(),
            modified_at: None,
            created_by: "jperez".to_string(),
            modified_by: None,
            region: region.to_string(),
            province: "Santiago".to_string(),
            municipality: "Navarrete".to_string(),
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

    fn assert_index_consistent(store: &LocalStore) {
        let reports = store.get_all();
        let index = store.index_snapshot();
        assert_eq!(reports.len(), index.len());
        for report in &reports {
            let entry = index
                .iter()
                .find(|e| e.id == report.id)
                .expect("record without index entry");
            assert_eq!(entry.report_number, report.report_number);
            assert_eq!(entry.region, report.region);
            assert_eq!(entry.status, report.status);
        }
        for entry in &index {
            assert!(store.get(&entry.id).is_some(), "index entry without record");
        }
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = store();
        let report = sample("DCR-2026-000001", "Cibao Norte");
        store.put(report.clone()).unwrap();

        assert_eq!(store.get(&report.id), Some(report));
        assert_eq!(store.metadata().total_reports, 1);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_get_all_orders_by_recent_activity() {
        let store = store();
        let older = sample("DCR-2026-000001", "Cibao Norte");
        let mut newer = sample("DCR-2026-000002", "Yuma");
        newer.created_at = older.created_at + chrono::Duration::minutes(5);
        store.put(older.clone()).unwrap();
        store.put(newer.clone()).unwrap();

        let all = store.get_all();
        assert_eq!(all[0].report_number, "DCR-2026-000002");

        // Touching the older report moves it to the front
        let mut touched = older;
        touched.modified_at = Some(newer.created_at + chrono::Duration::minutes(5));
        touched.version = 2;
        store.put(touched).unwrap();

        let all = store.get_all();
        assert_eq!(all[0].report_number, "DCR-2026-000001");
        assert_index_consistent(&store);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store();
        let report = sample("DCR-2026-000001", "Ozama");
        store.put(report.clone()).unwrap();

        assert!(store.delete(&report.id).unwrap());
        assert!(!store.delete(&report.id).unwrap());
        assert!(!store.delete("dcr_unknown").unwrap());
        assert_eq!(store.get_all().len(), 0);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_index_follows_create_update_delete() {
        let store = store();
        let report = sample("DCR-2026-000001", "Cibao Norte");
        store.put(report.clone()).unwrap();
        assert_index_consistent(&store);

        let mut updated = report.clone();
        updated.status = ReportStatus::Approved;
        updated.version = 2;
        updated.modified_at = Some(Utc::now());
        store.put(updated).unwrap();
        assert_index_consistent(&store);

        let entry = store.preview_by_number("DCR-2026-000001").unwrap();
        assert_eq!(entry.status, ReportStatus::Approved);

        store.delete(&report.id).unwrap();
        assert_index_consistent(&store);
        assert!(store.preview_by_number("DCR-2026-000001").is_none());
    }

    #[test]
    fn test_preview_falls_back_to_records_without_index() {
        // Simulate a record written before indexing existed: put it, then
        // reopen with the index key blanked.
        let kv = Arc::new(MemoryKv::new());
        let store = LocalStore::open(kv.clone()).unwrap();
        store.put(sample("DCR-2026-000001", "Valdesia")).unwrap();

        kv.set(INDEX_KEY, "[]").unwrap();
        let reopened = LocalStore::open(kv).unwrap();
        let preview = reopened.preview_by_number("DCR-2026-000001").unwrap();
        assert_eq!(preview.region, "Valdesia");
    }

    #[test]
    fn test_search_filters() {
        let store = store();
        store.put(sample("DCR-2026-000001", "Cibao Norte")).unwrap();
        let mut other = sample("DCR-2026-000002", "Yuma");
        other.status = ReportStatus::Completed;
        other.intervention_type = "Limpieza de cunetas".to_string();
        store.put(other).unwrap();

        let by_region = store.search(&ReportFilter::new().with_region("Cibao Norte"));
        assert_eq!(by_region.len(), 1);
        assert_eq!(by_region[0].report_number, "DCR-2026-000001");

        let mut by_type = ReportFilter::new();
        by_type.intervention_type = Some("cunetas".to_string());
        assert_eq!(store.search(&by_type).len(), 1);

        let by_text = ReportFilter::new().with_text("dcr-2026-000002");
        assert_eq!(store.search(&by_text).len(), 1);

        assert_eq!(store.search(&ReportFilter::new()).len(), 2);
    }

    #[test]
    fn test_report_numbers_strictly_increase() {
        let store = store();
        let first = store.next_report_number().unwrap();
        let second = store.next_report_number().unwrap();

        assert_ne!(first, second);
        let (_, seq1) = ident::parse_report_number(&first).unwrap();
        let (_, seq2) = ident::parse_report_number(&second).unwrap();
        assert_eq!(seq2, seq1 + 1);
        assert_eq!(seq1, 1);
        assert_eq!(store.metadata().last_report_number, 2);
    }

    #[test]
    fn test_counter_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(FileKv::open(dir.path()).unwrap());

        let store = LocalStore::open(kv.clone()).unwrap();
        store.next_report_number().unwrap();
        store.next_report_number().unwrap();
        drop(store);

        let reopened = LocalStore::open(kv).unwrap();
        let third = reopened.next_report_number().unwrap();
        let (_, seq) = ident::parse_report_number(&third).unwrap();
        assert_eq!(seq, 3);
    }

    #[test]
    fn test_corrupt_reports_key_treated_as_empty() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(REPORTS_KEY, "{not json").unwrap();

        let store = LocalStore::open(kv).unwrap();
        assert_eq!(store.get_all().len(), 0);
    }

    #[test]
    fn test_legacy_import_runs_once() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(
            LEGACY_KEY,
            r#"[{"region":"Enriquillo","tipoIntervencion":"Drenaje"},
                {"reportNumber":"DCR-2023-000008","region":"El Valle"}]"#,
        )
        .unwrap();

        let store = LocalStore::open(kv.clone()).unwrap();
        let imported = store.import_legacy().unwrap();
        assert_eq!(imported, 2);
        assert_index_consistent(&store);

        // Entry without a number got a generated one; entry with a number kept it
        assert!(store.preview_by_number("DCR-2023-000008").is_some());
        let all = store.get_all();
        assert!(all.iter().all(|r| r.status == ReportStatus::Completed));

        // Backup preserved
        assert!(kv.get(LEGACY_BACKUP_KEY).unwrap().is_some());

        // A reopened store must not reprocess
        let reopened = LocalStore::open(kv).unwrap();
        assert!(!reopened.is_fresh());
        assert_eq!(reopened.import_legacy().unwrap(), 0);
        assert_eq!(reopened.get_all().len(), 2);
    }

    #[test]
    fn test_database_export_import_replaces_wholesale() {
        let source = store();
        source.put(sample("DCR-2026-000001", "Higuamo")).unwrap();
        source.put(sample("DCR-2026-000002", "Ozama")).unwrap();
        let doc = source.export_database();

        let target = store();
        target.put(sample("DCR-2026-000099", "Yuma")).unwrap();

        let count = target.import_database(doc).unwrap();
        assert_eq!(count, 2);
        assert!(target.preview_by_number("DCR-2026-000099").is_none());
        assert_eq!(target.get_all().len(), 2);
        assert_index_consistent(&target);
    }
}
