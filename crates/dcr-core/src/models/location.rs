use serde::{Deserialize, Serialize};

/// Region names used to group reports for display.
///
/// Free-text region values on reports are not validated against this list;
/// it exists for presentation grouping only.
pub const REGIONS: &[&str] = &[
    "Cibao Norte",
    "Cibao Sur",
    "Cibao Nordeste",
    "Cibao Noroeste",
    "Valdesia",
    "Enriquillo",
    "El Valle",
    "Yuma",
    "Higuamo",
    "Ozama",
];

/// Returns true when the name matches one of the display-grouping regions.
pub fn is_known_region(name: &str) -> bool {
    REGIONS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// A single coordinate in decimal degrees (WGS 84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,

    /// Longitude in decimal degrees
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Start/end coordinates of an intervention stretch.
///
/// Either endpoint may be absent; distance derivation treats an incomplete
/// pair as zero length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GeoPoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<GeoPoint>,
}

impl GpsTrack {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both endpoints recorded
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_region_lookup() {
        assert!(is_known_region("Cibao Norte"));
        assert!(is_known_region("cibao norte"));
        assert!(!is_known_region("Cibao Oeste"));
    }

    #[test]
    fn test_incomplete_track() {
        let track = GpsTrack {
            start: Some(GeoPoint::new(19.45, -70.69)),
            end: None,
        };
        assert!(!track.is_complete());
        assert!(GpsTrack::default().start.is_none());
    }
}
