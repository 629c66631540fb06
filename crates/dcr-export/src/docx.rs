//! Word rendering for intervention reports.
//!
//! Layout is a pure function of the report: same record, same document,
//! modulo the timestamps embedded in the record itself.

use dcr_core::error::{DcrError, Result};
use dcr_core::metrics;
use dcr_core::models::{ExportKind, Report};
use dcr_core::ports::DocumentExporter;
use dcr_core::stats;
use docx_rs::{Docx, Paragraph, Run};
use std::io::Cursor;

/// Renders reports into Word documents.
///
/// Only [`ExportKind::Word`] is handled here; asking for another kind is a
/// typed export failure, not a panic.
#[derive(Debug, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExporter for DocxExporter {
    fn generate(&self, report: &Report, kind: ExportKind) -> Result<Vec<u8>> {
        match kind {
            ExportKind::Word => render_docx(report),
            other => Err(DcrError::ExportFailed {
                kind: other.to_string(),
                reason: "rendering for this kind is handled by an external collaborator"
                    .to_string(),
            }),
        }
    }

    fn supports(&self, kind: ExportKind) -> bool {
        matches!(kind, ExportKind::Word)
    }
}

fn render_docx(report: &Report) -> Result<Vec<u8>> {
    let mut doc = Docx::new()
        .add_paragraph(heading("Road Maintenance Intervention Report"))
        .add_paragraph(heading(&report.report_number))
        .add_paragraph(line("Status", report.status.as_str()))
        .add_paragraph(line("Version", &report.version.to_string()))
        .add_paragraph(line("Created by", &report.created_by))
        .add_paragraph(line(
            "Created at",
            &report.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ));

    if let (Some(by), Some(at)) = (&report.modified_by, &report.modified_at) {
        doc = doc.add_paragraph(line(
            "Last modified",
            &format!("{} ({})", at.format("%Y-%m-%d %H:%M UTC"), by),
        ));
    }

    doc = doc
        .add_paragraph(heading("Location"))
        .add_paragraph(line("Region", &report.region))
        .add_paragraph(line("Province", &report.province))
        .add_paragraph(line("Municipality", &report.municipality));
    if !report.district.is_empty() {
        doc = doc.add_paragraph(line("District", &report.district));
    }
    if !report.sector.is_empty() {
        doc = doc.add_paragraph(line("Sector", &report.sector));
    }

    doc = doc
        .add_paragraph(heading("Intervention"))
        .add_paragraph(line("Type", &report.intervention_type));
    if let Some(subtype) = &report.intervention_subtype {
        doc = doc.add_paragraph(line("Subtype", subtype));
    }

    if !report.metrics.is_empty() {
        doc = doc.add_paragraph(heading("Metrics"));
        for (key, value) in &report.metrics {
            doc = doc.add_paragraph(line(
                &metrics::display_label(key),
                &metrics::display_value(key, value),
            ));
        }
    }

    if let Some(gps) = &report.gps {
        doc = doc.add_paragraph(heading("GPS"));
        if let Some(start) = gps.start {
            doc = doc.add_paragraph(line("Start", &format!("{:.5}, {:.5}", start.lat, start.lon)));
        }
        if let Some(end) = gps.end {
            doc = doc.add_paragraph(line("End", &format!("{:.5}, {:.5}", end.lat, end.lon)));
        }
        if gps.is_complete() {
            doc = doc.add_paragraph(line(
                "Distance",
                &format!("{:.2} km", stats::report_distance_km(report)),
            ));
        }
    }

    if let Some(observations) = &report.observations {
        doc = doc
            .add_paragraph(heading("Observations"))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(observations.as_str())));
    }

    if !report.media.is_empty() {
        doc = doc.add_paragraph(heading("Attachments")).add_paragraph(line(
            "Media",
            &format!(
                "{} image(s), {} video(s), {} document(s)",
                report.media.images.len(),
                report.media.videos.len(),
                report.media.documents.len()
            ),
        ));
    }

    let mut buffer = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buffer)
        .map_err(|e| DcrError::ExportFailed {
            kind: ExportKind::Word.to_string(),
            reason: format!("Failed to pack document: {e}"),
        })?;

    Ok(buffer.into_inner())
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(28))
}

fn line(label: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(format!("{label}: ")).bold())
        .add_run(Run::new().add_text(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dcr_core::ident;
    use dcr_core::models::{GeoPoint, GpsTrack, MediaRefs, ReportStatus};
    use std::collections::BTreeMap;

    fn sample_report() -> Report {
        let number = "DCR-2026-000001".to_string();
        let mut metrics = BTreeMap::new();
        metrics.insert("length".to_string(), "120".to_string());
        metrics.insert("cunetas_limpiadas".to_string(), "4".to_string());

        Report {
            id: ident::encode(&number),
            report_number: number,
            created_at: Utc::now(),
            modified_at: None,
            created_by: "jperez".to_string(),
            modified_by: None,
            region: "Cibao Norte".to_string(),
            province: "Santiago".to_string(),
            municipality: "Navarrete".to_string(),
            district: String::new(),
            sector: String::new(),
            intervention_type: "Bacheo".to_string(),
            intervention_subtype: None,
            observations: Some("Tramo norte reparado".to_string()),
            metrics,
            gps: Some(GpsTrack::new(
                GeoPoint::new(19.45, -70.69),
                GeoPoint::new(19.46, -70.70),
            )),
            media: MediaRefs::default(),
            generated_files: BTreeMap::new(),
            status: ReportStatus::Completed,
            version: 1,
            tags: Vec::new(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_word_rendering_produces_a_zip_container() {
        let exporter = DocxExporter::new();
        let bytes = exporter.generate(&sample_report(), ExportKind::Word).unwrap();

        // .docx is a zip archive
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_other_kinds_are_typed_failures() {
        let exporter = DocxExporter::new();
        assert!(!exporter.supports(ExportKind::Pdf));
        assert!(exporter.supports(ExportKind::Word));

        let err = exporter.generate(&sample_report(), ExportKind::Excel);
        assert!(matches!(err, Err(DcrError::ExportFailed { .. })));
    }
}
