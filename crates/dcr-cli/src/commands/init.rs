//! Init command: prepare the local store and run the one-time legacy import.

use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::{Context, Result};
use dcr_core::config::LayeredConfig;

pub fn execute(storage: &Storage, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let imported = storage
        .local
        .import_legacy()
        .context("Legacy import failed; the store was left untouched")?;

    output.success(format!(
        "Store ready at {}",
        config.storage_dir.value.display()
    ));

    if imported > 0 {
        output.info(format!(
            "Imported {imported} legacy report(s); the original payload was kept as a backup"
        ));
    }

    let meta = storage.local.metadata();
    output.kv("Reports", meta.total_reports);
    output.kv("Last report number", meta.last_report_number);
    match &config.remote_url.value {
        Some(url) => output.kv("Remote store", url),
        None => output.kv("Remote store", "(offline)"),
    }

    Ok(())
}
