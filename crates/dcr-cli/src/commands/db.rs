//! Whole-database export and import.
//!
//! The exported document carries records, index, and metadata in one JSON
//! file; importing replaces all of them wholesale.

use crate::cli::{DbArgs, DbCommand, DbExportArgs, DbImportArgs};
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::{Context, Result};
use dcr_store::DatabaseExport;
use dialoguer::Confirm;
use std::fs;

pub fn execute(args: DbArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    match args.command {
        DbCommand::Export(export_args) => execute_export(export_args, storage, output),
        DbCommand::Import(import_args) => execute_import(import_args, storage, output),
    }
}

fn execute_export(args: DbExportArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let doc = storage.local.export_database();
    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize database")?;
    fs::write(&args.out, json)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    output.success(format!(
        "Exported {} report(s) to {}",
        doc.metadata.total_reports,
        args.out.display()
    ));
    Ok(())
}

fn execute_import(args: DbImportArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let raw = fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let doc: DatabaseExport =
        serde_json::from_str(&raw).context("File is not a DCR database export")?;

    if !args.yes && !output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace the whole local database with {} report(s) from {}?",
                doc.reports.len(),
                args.path.display()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            output.info("Import cancelled");
            return Ok(());
        }
    }

    let count = storage.local.import_database(doc)?;
    output.success(format!("Imported {count} report(s); previous contents were replaced"));
    Ok(())
}
