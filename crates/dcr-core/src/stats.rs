//! Statistics aggregation over report snapshots.
//!
//! Aggregation is a pure function re-derived on demand; there is no
//! incremental maintenance. O(n) over the snapshot, which stays small at a
//! single organization's report volume.

use geo::{Distance, Haversine, Point};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{GeoPoint, Report, ReportStatus};

/// Great-circle distance between two coordinates in kilometers
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let from = Point::new(a.lon, a.lat);
    let to = Point::new(b.lon, b.lat);
    Haversine.distance(from, to) / 1000.0
}

/// Distance covered by one report's GPS pair.
///
/// A report without both endpoints contributes zero.
pub fn report_distance_km(report: &Report) -> f64 {
    match report.gps {
        Some(gps) => match (gps.start, gps.end) {
            (Some(start), Some(end)) => haversine_km(start, end),
            _ => 0.0,
        },
        None => 0.0,
    }
}

/// Per-region rollup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionBreakdown {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    /// Draft and in-review reports
    pub in_progress: u64,
    pub distance_km: f64,
}

/// Derived counts and distance totals over a report snapshot
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportStatistics {
    pub total_reports: u64,
    pub by_region: BTreeMap<String, u64>,
    pub by_province: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
    pub by_user: BTreeMap<String, u64>,
    pub regions: BTreeMap<String, RegionBreakdown>,
    pub total_distance_km: f64,
}

/// Aggregate a snapshot of reports
pub fn aggregate(reports: &[Report]) -> ReportStatistics {
    let mut stats = ReportStatistics {
        total_reports: reports.len() as u64,
        ..Default::default()
    };

    for report in reports {
        *stats.by_region.entry(report.region.clone()).or_default() += 1;
        if !report.province.is_empty() {
            *stats.by_province.entry(report.province.clone()).or_default() += 1;
        }
        *stats.by_type.entry(report.intervention_type.clone()).or_default() += 1;
        *stats.by_status.entry(report.status.as_str().to_string()).or_default() += 1;
        *stats.by_user.entry(report.created_by.clone()).or_default() += 1;

        let distance = report_distance_km(report);
        stats.total_distance_km += distance;

        let breakdown = stats.regions.entry(report.region.clone()).or_default();
        breakdown.total += 1;
        breakdown.distance_km += distance;
        match report.status {
            ReportStatus::Completed => breakdown.completed += 1,
            ReportStatus::Pending => breakdown.pending += 1,
            ReportStatus::Draft | ReportStatus::InReview => breakdown.in_progress += 1,
            ReportStatus::Approved | ReportStatus::Rejected => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::MediaRefs;
    use crate::models::GpsTrack;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn report(region: &str, status: ReportStatus, gps: Option<GpsTrack>) -> Report {
        Report {
            id: format!("dcr_{region}_{status}"),
            report_number: "DCR-2026-000001".to_string(),
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
            gps,
            media: MediaRefs::default(),
            generated_files: BTreeMap::new(),
            status,
            version: 1,
            tags: Vec::new(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let p = GeoPoint::new(18.4861, -69.9312);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_of_longitude() {
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.5, "expected ~111.19 km, got {d}");
    }

    #[test]
    fn test_report_without_gps_contributes_zero() {
        let without = report("Ozama", ReportStatus::Pending, None);
        assert_eq!(report_distance_km(&without), 0.0);

        let partial = report(
            "Ozama",
            ReportStatus::Pending,
            Some(GpsTrack {
                start: Some(GeoPoint::new(18.5, -69.9)),
                end: None,
            }),
        );
        assert_eq!(report_distance_km(&partial), 0.0);
    }

    #[test]
    fn test_aggregate_counts_and_distance() {
        let track = GpsTrack::new(GeoPoint::new(19.45, -70.69), GeoPoint::new(19.46, -70.70));
        let reports = vec![
            report("Cibao Norte", ReportStatus::Completed, Some(track)),
            report("Cibao Norte", ReportStatus::Pending, None),
            report("Cibao Norte", ReportStatus::InReview, None),
            report("Yuma", ReportStatus::Draft, None),
        ];

        let stats = aggregate(&reports);
        assert_eq!(stats.total_reports, 4);
        assert_eq!(stats.by_region["Cibao Norte"], 3);
        assert_eq!(stats.by_region["Yuma"], 1);
        assert_eq!(stats.by_status["completed"], 1);
        assert_eq!(stats.by_user["jperez"], 4);

        let cibao = &stats.regions["Cibao Norte"];
        assert_eq!(cibao.total, 3);
        assert_eq!(cibao.completed, 1);
        assert_eq!(cibao.pending, 1);
        assert_eq!(cibao.in_progress, 1);
        assert!(cibao.distance_km > 1.0 && cibao.distance_km < 2.0);

        let yuma = &stats.regions["Yuma"];
        assert_eq!(yuma.in_progress, 1);
        assert_eq!(stats.total_distance_km, cibao.distance_km);
    }

    #[test]
    fn test_aggregate_empty_snapshot() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_reports, 0);
        assert!(stats.by_region.is_empty());
        assert_eq!(stats.total_distance_km, 0.0);
    }
}
