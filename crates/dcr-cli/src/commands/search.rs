//! Search command: AND-composed filters over the local store.

use crate::cli::SearchArgs;
use crate::output::OutputWriter;
use crate::parse;
use crate::rows::ReportRow;
use crate::storage::Storage;
use anyhow::Result;
use dcr_core::models::ReportFilter;

pub fn execute(args: SearchArgs, storage: &Storage, output: &OutputWriter) -> Result<()> {
    let filter = ReportFilter {
        region: args.region,
        province: args.province,
        municipality: args.municipality,
        district: args.district,
        created_by: args.created_by,
        status: args.status.as_deref().map(parse::parse_status).transpose()?,
        intervention_type: args.intervention_type,
        from: args.from.as_deref().map(parse::parse_day_start).transpose()?,
        to: args.to.as_deref().map(parse::parse_day_end).transpose()?,
        text: args.text,
    };

    let matches = storage.service.search(&filter);
    if matches.is_empty() && !output.is_json() {
        output.info("No reports match the given filters");
        return Ok(());
    }

    let rows: Vec<ReportRow> = matches.iter().map(ReportRow::from).collect();
    output.table(rows);
    Ok(())
}
