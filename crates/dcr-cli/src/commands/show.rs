//! Show command: one report in full, remote-first.

use crate::cli::ShowArgs;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::Result;
use dcr_core::{metrics, stats};

pub async fn execute(args: ShowArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let Some(report) = storage.service.get_by_number(&args.number).await? else {
        output.error(format!("No report found with number {}", args.number));
        return Ok(());
    };

    if output.is_json() {
        return output.result(report);
    }

    output.section(&report.report_number);
    output.kv("Status", report.status);
    output.kv("Version", report.version);
    output.kv("Created", format!("{} by {}", report.created_at.format("%Y-%m-%d %H:%M UTC"), report.created_by));
    if let (Some(at), Some(by)) = (&report.modified_at, &report.modified_by) {
        output.kv("Modified", format!("{} by {}", at.format("%Y-%m-%d %H:%M UTC"), by));
    }

    output.section("Location");
    output.kv("Region", &report.region);
    output.kv("Province", &report.province);
    output.kv("Municipality", &report.municipality);
    if !report.district.is_empty() {
        output.kv("District", &report.district);
    }
    if !report.sector.is_empty() {
        output.kv("Sector", &report.sector);
    }

    output.section("Intervention");
    output.kv("Type", &report.intervention_type);
    if let Some(subtype) = &report.intervention_subtype {
        output.kv("Subtype", subtype);
    }
    if let Some(observations) = &report.observations {
        output.kv("Observations", observations);
    }

    if !report.metrics.is_empty() {
        output.section("Metrics");
        for (key, value) in &report.metrics {
            output.kv(metrics::display_label(key), metrics::display_value(key, value));
        }
    }

    if let Some(gps) = &report.gps {
        output.section("GPS");
        if let Some(start) = gps.start {
            output.kv("Start", format!("{:.5}, {:.5}", start.lat, start.lon));
        }
        if let Some(end) = gps.end {
            output.kv("End", format!("{:.5}, {:.5}", end.lat, end.lon));
        }
        if gps.is_complete() {
            output.kv("Distance", format!("{:.2} km", stats::report_distance_km(&report)));
        }
    }

    if !report.generated_files.is_empty() {
        output.section("Generated documents");
        for (kind, file) in &report.generated_files {
            output.kv(
                kind,
                format!(
                    "{} ({} bytes, {})",
                    file.filename,
                    file.size_bytes,
                    file.generated_at.format("%Y-%m-%d %H:%M UTC")
                ),
            );
        }
    }

    Ok(())
}
