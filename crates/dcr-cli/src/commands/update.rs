//! Update command: mutate an existing report through the single save path.

use crate::cli::UpdateArgs;
use crate::output::OutputWriter;
use crate::parse;
use crate::storage::Storage;
use anyhow::Result;
use dcr_core::config::LayeredConfig;
use dcr_core::ident;
use dcr_store::{RemoteOutcome, ReportChanges};

pub async fn execute(
    args: UpdateArgs,
    storage: &Storage,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let changes = ReportChanges {
        status: args.status.as_deref().map(parse::parse_status).transpose()?,
        observations: args.observations,
        metrics: if args.metrics.is_empty() {
            None
        } else {
            Some(parse::parse_metrics(&args.metrics)?)
        },
        gps: parse::parse_track(args.gps_start.as_deref(), args.gps_end.as_deref())?,
        intervention_subtype: args.subtype,
        ..Default::default()
    };

    let id = ident::encode(&args.number);
    let receipt = storage
        .service
        .update_report(&id, changes, &config.default_user.value)
        .await?;

    output.success(format!(
        "Updated report {} to version {}",
        receipt.report.report_number, receipt.report.version
    ));
    output.kv("Status", receipt.report.status);

    if let RemoteOutcome::Failed(reason) = &receipt.remote {
        output.warning(format!(
            "Remote update failed ({reason}); the change is safe locally"
        ));
    }

    Ok(())
}
