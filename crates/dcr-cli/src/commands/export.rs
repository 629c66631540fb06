//! Export command: render a report and place the bytes in the blob area.
//!
//! The record itself only carries the pointer (filename, hash, size); the
//! bytes land under `<storage>/blobs/` or at an explicit output path.

use crate::cli::ExportArgs;
use crate::output::OutputWriter;
use crate::parse;
use crate::storage::Storage;
use anyhow::{Context, Result};
use dcr_core::ident;
use dcr_store::{ExportReceipt, RemoteOutcome};
use std::fs;
use std::path::{Path, PathBuf};

pub async fn execute(args: ExportArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let kind = parse::parse_kind(&args.kind)?;
    let id = ident::encode(&args.number);

    let receipt = match storage.service.export_report(&id, kind).await {
        Ok(receipt) => receipt,
        Err(e) => {
            output.error(format!("Export failed: {e}. The report is unchanged; try again"));
            return Ok(());
        }
    };

    let path = match &args.out {
        Some(out) => {
            fs::write(out, &receipt.bytes)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            out.clone()
        }
        None => place_blob(&storage.blobs_dir, &receipt)?,
    };

    output.success(format!(
        "Rendered {} for {}",
        kind, receipt.report.report_number
    ));
    output.kv("File", path.display());
    output.kv("Size", format!("{} bytes", receipt.pointer.size_bytes));
    output.kv("Hash", &receipt.pointer.content_hash);

    if let RemoteOutcome::Failed(reason) = &receipt.remote {
        output.warning(format!(
            "Remote update failed ({reason}); the document pointer is safe locally"
        ));
    }

    Ok(())
}

/// Write export bytes into the content-addressed blob area and return the
/// path. Blobs are keyed by report number, kind, and content hash, so
/// re-rendering an unchanged report overwrites the same file.
pub fn place_blob(blobs_dir: &Path, receipt: &ExportReceipt) -> Result<PathBuf> {
    fs::create_dir_all(blobs_dir)
        .with_context(|| format!("Failed to create {}", blobs_dir.display()))?;

    let short_hash = &receipt.pointer.content_hash[..12.min(receipt.pointer.content_hash.len())];
    let extension = receipt.pointer.filename.rsplit('.').next().unwrap_or("bin");
    let path = blobs_dir.join(format!(
        "{}-{}.{}",
        receipt.report.report_number, short_hash, extension
    ));

    fs::write(&path, &receipt.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
