//! New command: record an intervention report.

use crate::cli::NewArgs;
use crate::output::OutputWriter;
use crate::parse;
use crate::storage::Storage;
use anyhow::Result;
use dcr_core::config::LayeredConfig;
use dcr_core::models::{location, MediaRefs};
use dcr_store::{NewReport, RemoteOutcome};

pub async fn execute(
    args: NewArgs,
    storage: &Storage,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let status = args.status.as_deref().map(parse::parse_status).transpose()?;
    let export_kinds = args
        .export_kinds
        .iter()
        .map(|raw| parse::parse_kind(raw))
        .collect::<Result<Vec<_>>>()?;

    let draft = NewReport {
        created_by: config.default_user.value.clone(),
        region: args.region,
        province: args.province,
        municipality: args.municipality,
        district: args.district,
        sector: args.sector,
        intervention_type: args.intervention,
        intervention_subtype: args.subtype,
        observations: args.observations,
        metrics: parse::parse_metrics(&args.metrics)?,
        gps: parse::parse_track(args.gps_start.as_deref(), args.gps_end.as_deref())?,
        media: MediaRefs {
            images: args.images,
            videos: args.videos,
            documents: args.documents,
        },
        status,
        tags: args.tags,
        categories: args.categories,
    };

    if !location::is_known_region(&draft.region) {
        output.info(format!(
            "'{}' is not one of the standard display regions; statistics will group it as-is",
            draft.region
        ));
    }

    let receipt = storage.service.create_report(draft).await?;
    output.success(format!("Saved report {}", receipt.report.report_number));
    output.kv("Id", &receipt.report.id);
    output.kv("Status", receipt.report.status);

    if let RemoteOutcome::Failed(reason) = &receipt.remote {
        output.warning(format!(
            "Remote write failed ({reason}); the report is safe locally and will sync on the next successful refresh"
        ));
    }

    // Document rendering is best-effort; a failure never undoes the save
    for kind in export_kinds {
        match storage.service.export_report(&receipt.report.id, kind).await {
            Ok(export) => {
                let path = super::export::place_blob(&storage.blobs_dir, &export)?;
                output.info(format!("Rendered {kind} document at {}", path.display()));
            }
            Err(e) => output.warning(format!("{kind} rendering failed, report kept: {e}")),
        }
    }

    Ok(())
}
