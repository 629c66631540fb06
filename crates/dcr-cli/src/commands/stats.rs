//! Stats command: on-demand aggregation over the policy-resolved snapshot.

use crate::output::OutputWriter;
use crate::rows::RegionRow;
use crate::storage::Storage;
use anyhow::Result;

pub async fn execute(storage: &Storage, output: &OutputWriter) -> Result<()> {
    let stats = storage.service.statistics().await?;

    if output.is_json() {
        return output.result(stats);
    }

    output.section("Overview");
    output.kv("Reports", stats.total_reports);
    output.kv("Total distance", format!("{:.2} km", stats.total_distance_km));

    if !stats.by_status.is_empty() {
        output.section("By status");
        for (status, count) in &stats.by_status {
            output.kv(status, count);
        }
    }

    if !stats.by_type.is_empty() {
        output.section("By intervention type");
        for (kind, count) in &stats.by_type {
            output.kv(kind, count);
        }
    }

    if !stats.by_user.is_empty() {
        output.section("By user");
        for (user, count) in &stats.by_user {
            output.kv(user, count);
        }
    }

    if !stats.regions.is_empty() {
        output.section("By region");
        let rows: Vec<RegionRow> = stats
            .regions
            .iter()
            .map(|(region, breakdown)| RegionRow {
                region: region.clone(),
                total: breakdown.total,
                completed: breakdown.completed,
                pending: breakdown.pending,
                in_progress: breakdown.in_progress,
                distance_km: format!("{:.2}", breakdown.distance_km),
            })
            .collect();
        output.table(rows);
    }

    Ok(())
}
