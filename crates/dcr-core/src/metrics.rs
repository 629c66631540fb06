//! Metric registry: typed metadata for known metric keys.
//!
//! Report metrics are an open string-to-string mapping. The registry maps
//! the keys the export layer understands to a display label, a unit, and a
//! value kind; unknown keys fall through to a humanized rendering so new
//! field vocabulary never breaks export.

/// How a metric value should be interpreted at presentation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Length,
    Area,
    Volume,
    Count,
    Text,
}

/// Presentation metadata for one known metric key
#[derive(Debug, Clone, Copy)]
pub struct MetricInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub kind: ValueKind,
}

/// Keys the export layer renders with a proper label and unit
pub const REGISTRY: &[MetricInfo] = &[
    MetricInfo { key: "length", label: "Length", unit: Some("m"), kind: ValueKind::Length },
    MetricInfo { key: "width", label: "Width", unit: Some("m"), kind: ValueKind::Length },
    MetricInfo { key: "thickness", label: "Thickness", unit: Some("cm"), kind: ValueKind::Length },
    MetricInfo { key: "area", label: "Area", unit: Some("m²"), kind: ValueKind::Area },
    MetricInfo { key: "volume", label: "Volume", unit: Some("m³"), kind: ValueKind::Volume },
    MetricInfo { key: "asphalt_tonnage", label: "Asphalt tonnage", unit: Some("t"), kind: ValueKind::Volume },
    MetricInfo { key: "potholes_filled", label: "Potholes filled", unit: None, kind: ValueKind::Count },
    MetricInfo { key: "signage_units", label: "Signage units", unit: None, kind: ValueKind::Count },
    MetricInfo { key: "culverts_cleared", label: "Culverts cleared", unit: None, kind: ValueKind::Count },
    MetricInfo { key: "crew_size", label: "Crew size", unit: None, kind: ValueKind::Count },
    MetricInfo { key: "material", label: "Material", unit: None, kind: ValueKind::Text },
];

/// Registry entry for a metric key, if it is a known one
pub fn lookup(key: &str) -> Option<&'static MetricInfo> {
    REGISTRY.iter().find(|info| info.key == key)
}

/// Display label for a metric key: registry label for known keys, a
/// humanized form of the key otherwise
pub fn display_label(key: &str) -> String {
    match lookup(key) {
        Some(info) => info.label.to_string(),
        None => humanize(key),
    }
}

/// Value with its unit appended when the registry knows one
pub fn display_value(key: &str, value: &str) -> String {
    match lookup(key).and_then(|info| info.unit) {
        Some(unit) => format!("{value} {unit}"),
        None => value.to_string(),
    }
}

// "base_course" / "baseCourse" -> "Base course"
fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for chunk in key.split(['_', '-', ' ']) {
        let mut word = String::new();
        for ch in chunk.chars() {
            if ch.is_uppercase() && !word.is_empty() {
                words.push(word.to_lowercase());
                word = String::new();
            }
            word.push(ch);
        }
        if !word.is_empty() {
            words.push(word.to_lowercase());
        }
    }

    let mut out = words.join(" ");
    if let Some(first) = out.get(..1) {
        let upper = first.to_uppercase();
        out.replace_range(..1, &upper);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_key() {
        let info = lookup("area").unwrap();
        assert_eq!(info.label, "Area");
        assert_eq!(info.unit, Some("m²"));
        assert_eq!(info.kind, ValueKind::Area);
    }

    #[test]
    fn test_display_value_appends_unit() {
        assert_eq!(display_value("length", "120"), "120 m");
        assert_eq!(display_value("potholes_filled", "14"), "14");
        assert_eq!(display_value("cunetas_limpiadas", "3"), "3");
    }

    #[test]
    fn test_unknown_key_is_humanized() {
        assert_eq!(display_label("cunetas_limpiadas"), "Cunetas limpiadas");
        assert_eq!(display_label("baseCourse"), "Base course");
        assert_eq!(display_label("guard-rail_m"), "Guard rail m");
    }

    #[test]
    fn test_registry_keys_are_unique() {
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in &REGISTRY[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
