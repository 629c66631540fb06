//! Parsing of CLI argument formats into domain values.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use dcr_core::models::{ExportKind, GeoPoint, GpsTrack, ReportStatus};
use std::collections::BTreeMap;

/// "lat,lon" in decimal degrees
pub fn parse_point(raw: &str) -> Result<GeoPoint> {
    let (lat, lon) = raw
        .split_once(',')
        .with_context(|| format!("Expected LAT,LON, got '{raw}'"))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude '{lat}'"))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude '{lon}'"))?;
    Ok(GeoPoint::new(lat, lon))
}

/// Optional start/end coordinates into a track
pub fn parse_track(start: Option<&str>, end: Option<&str>) -> Result<Option<GpsTrack>> {
    let start = start.map(parse_point).transpose()?;
    let end = end.map(parse_point).transpose()?;
    if start.is_none() && end.is_none() {
        return Ok(None);
    }
    Ok(Some(GpsTrack { start, end }))
}

/// Repeatable "key=value" metric flags into the metric mapping
pub fn parse_metrics(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut metrics = BTreeMap::new();
    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{entry}'"))?;
        if key.trim().is_empty() {
            bail!("Metric key must not be empty in '{entry}'");
        }
        metrics.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(metrics)
}

pub fn parse_status(raw: &str) -> Result<ReportStatus> {
    ReportStatus::parse(raw).with_context(|| {
        format!("Unknown status '{raw}'. Use completed, pending, draft, in_review, approved, or rejected")
    })
}

pub fn parse_kind(raw: &str) -> Result<ExportKind> {
    match raw.trim().to_lowercase().as_str() {
        "pdf" => Ok(ExportKind::Pdf),
        "excel" | "xlsx" => Ok(ExportKind::Excel),
        "word" | "docx" => Ok(ExportKind::Word),
        _ => bail!("Unknown export kind '{raw}'. Use pdf, excel, or word"),
    }
}

/// "YYYY-MM-DD" into the first instant of that day
pub fn parse_day_start(raw: &str) -> Result<DateTime<Utc>> {
    Ok(parse_day(raw)?.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// "YYYY-MM-DD" into the last instant of that day
pub fn parse_day_end(raw: &str) -> Result<DateTime<Utc>> {
    Ok(parse_day(raw)?.and_hms_opt(23, 59, 59).unwrap().and_utc())
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Expected YYYY-MM-DD, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        let point = parse_point("19.45, -70.69").unwrap();
        assert_eq!(point.lat, 19.45);
        assert_eq!(point.lon, -70.69);
        assert!(parse_point("19.45").is_err());
        assert!(parse_point("abc,def").is_err());
    }

    #[test]
    fn test_parse_track_requires_some_point() {
        assert!(parse_track(None, None).unwrap().is_none());
        let track = parse_track(Some("1,2"), None).unwrap().unwrap();
        assert!(track.start.is_some());
        assert!(track.end.is_none());
    }

    #[test]
    fn test_parse_metrics() {
        let metrics =
            parse_metrics(&["length=120".to_string(), "material=asphalt".to_string()]).unwrap();
        assert_eq!(metrics["length"], "120");
        assert_eq!(metrics["material"], "asphalt");
        assert!(parse_metrics(&["no-separator".to_string()]).is_err());
        assert!(parse_metrics(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("word").unwrap(), ExportKind::Word);
        assert_eq!(parse_kind("DOCX").unwrap(), ExportKind::Word);
        assert_eq!(parse_kind("xlsx").unwrap(), ExportKind::Excel);
        assert!(parse_kind("odt").is_err());
    }

    #[test]
    fn test_parse_day_bounds() {
        let start = parse_day_start("2026-08-05").unwrap();
        let end = parse_day_end("2026-08-05").unwrap();
        assert!(start < end);
        assert_eq!(start.to_rfc3339(), "2026-08-05T00:00:00+00:00");
        assert!(parse_day_start("05/08/2026").is_err());
    }
}
