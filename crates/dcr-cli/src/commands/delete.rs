//! Delete command: destructive, so it confirms first and reports partial
//! outcomes instead of discarding them.

use crate::cli::DeleteArgs;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::Result;
use dcr_core::ident;
use dcr_store::RemoteOutcome;
use dialoguer::Confirm;

pub async fn execute(args: DeleteArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    if storage.service.preview_by_number(&args.number).is_none() {
        // Might still exist remotely; warn but keep going only when forced
        output.warning(format!("Report {} is not in the local store", args.number));
    }

    if !args.yes && !output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete report {}? This cannot be undone", args.number))
            .default(false)
            .interact()?;
        if !confirmed {
            output.info("Delete cancelled");
            return Ok(());
        }
    }

    let id = ident::encode(&args.number);
    let receipt = storage.service.delete_report(&id).await?;

    if receipt.removed() {
        output.success(format!("Deleted report {}", args.number));
        if let RemoteOutcome::Failed(reason) = &receipt.remote {
            output.warning(format!(
                "Remote delete failed ({reason}); run the delete again when the remote is reachable"
            ));
        }
    } else {
        output.error(format!("No report found with number {}", args.number));
    }

    Ok(())
}
