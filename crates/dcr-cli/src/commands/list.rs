//! List command: listing straight from the secondary index, no full-record
//! deserialization.

use crate::cli::ListArgs;
use crate::output::OutputWriter;
use crate::rows::ReportRow;
use crate::storage::Storage;
use anyhow::Result;

pub fn execute(args: ListArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let mut entries = storage.service.index();
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    let rows: Vec<ReportRow> = entries.iter().map(ReportRow::from).collect();
    output.table(rows);
    Ok(())
}
