use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::report::{Report, ReportStatus};

/// Conjunction of optional report filters.
///
/// Every populated field constrains the result set; absent fields impose no
/// constraint. Filters compose with logical AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    pub region: Option<String>,
    pub province: Option<String>,
    pub municipality: Option<String>,
    pub district: Option<String>,
    pub created_by: Option<String>,
    pub status: Option<ReportStatus>,

    /// Case-insensitive substring match against the intervention type
    pub intervention_type: Option<String>,

    /// Inclusive lower bound on creation time
    pub from: Option<DateTime<Utc>>,

    /// Inclusive upper bound on creation time
    pub to: Option<DateTime<Utc>>,

    /// Case-insensitive free text matched against report number,
    /// intervention type, observations, municipality, and province
    pub text: Option<String>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// True when no field constrains the result set
    pub fn is_empty(&self) -> bool {
        self.region.is_none()
            && self.province.is_none()
            && self.municipality.is_none()
            && self.district.is_none()
            && self.created_by.is_none()
            && self.status.is_none()
            && self.intervention_type.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.text.is_none()
    }

    /// Evaluate the conjunction against a single report
    pub fn matches(&self, report: &Report) -> bool {
        if let Some(ref region) = self.region {
            if &report.region != region {
                return false;
            }
        }
        if let Some(ref province) = self.province {
            if &report.province != province {
                return false;
            }
        }
        if let Some(ref municipality) = self.municipality {
            if &report.municipality != municipality {
                return false;
            }
        }
        if let Some(ref district) = self.district {
            if &report.district != district {
                return false;
            }
        }
        if let Some(ref created_by) = self.created_by {
            if &report.created_by != created_by {
                return false;
            }
        }
        if let Some(status) = self.status {
            if report.status != status {
                return false;
            }
        }
        if let Some(ref fragment) = self.intervention_type {
            if !contains_ignore_case(&report.intervention_type, fragment) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if report.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if report.created_at > to {
                return false;
            }
        }
        if let Some(ref text) = self.text {
            if !self.text_matches(report, text) {
                return false;
            }
        }
        true
    }

    fn text_matches(&self, report: &Report, text: &str) -> bool {
        contains_ignore_case(&report.report_number, text)
            || contains_ignore_case(&report.intervention_type, text)
            || report
                .observations
                .as_deref()
                .is_some_and(|obs| contains_ignore_case(obs, text))
            || contains_ignore_case(&report.municipality, text)
            || contains_ignore_case(&report.province, text)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::MediaRefs;
    use std::collections::BTreeMap;

    fn report(region: &str, municipality: &str, kind: &str, status: ReportStatus) -> Report {
        Report {
            id: format!("dcr_{region}"),
            report_number: "DCR-2026-000007".to_string(),
            created_at: Utc::now(),
            modified_at: None,
            created_by: "mgarcia".to_string(),
            modified_by: None,
            region: region.to_string(),
            province: "Santiago".to_string(),
            municipality: municipality.to_string(),
            district: String::new(),
            sector: String::new(),
            intervention_type: kind.to_string(),
            intervention_subtype: None,
            observations: Some("Shoulder regraded after heavy rain".to_string()),
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
    fn test_empty_filter_matches_everything() {
        let filter = ReportFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&report("Ozama", "Santo Domingo Este", "Bacheo", ReportStatus::Pending)));
    }

    #[test]
    fn test_filters_compose_with_and() {
        let filter = ReportFilter::new()
            .with_region("Cibao Norte")
            .with_status(ReportStatus::Completed);

        let matching = report("Cibao Norte", "Navarrete", "Bacheo", ReportStatus::Completed);
        let wrong_status = report("Cibao Norte", "Navarrete", "Bacheo", ReportStatus::Pending);
        let wrong_region = report("Yuma", "Higüey", "Bacheo", ReportStatus::Completed);

        assert!(filter.matches(&matching));
        assert!(!filter.matches(&wrong_status));
        assert!(!filter.matches(&wrong_region));
    }

    #[test]
    fn test_intervention_type_substring_match() {
        let mut filter = ReportFilter::new();
        filter.intervention_type = Some("bach".to_string());
        assert!(filter.matches(&report("Ozama", "Boca Chica", "Bacheo asfáltico", ReportStatus::Draft)));
        assert!(!filter.matches(&report("Ozama", "Boca Chica", "Limpieza", ReportStatus::Draft)));
    }

    #[test]
    fn test_free_text_searches_observations() {
        let filter = ReportFilter::new().with_text("HEAVY RAIN");
        assert!(filter.matches(&report("El Valle", "Jimaní", "Drenaje", ReportStatus::Pending)));

        let filter = ReportFilter::new().with_text("bridge");
        assert!(!filter.matches(&report("El Valle", "Jimaní", "Drenaje", ReportStatus::Pending)));
    }

    #[test]
    fn test_time_range_bounds_are_inclusive() {
        let r = report("Valdesia", "Baní", "Sellado", ReportStatus::Completed);
        let mut filter = ReportFilter::new();
        filter.from = Some(r.created_at);
        filter.to = Some(r.created_at);
        assert!(filter.matches(&r));

        filter.from = Some(r.created_at + chrono::Duration::seconds(1));
        assert!(!filter.matches(&r));
    }
}
