//! Status command: store metadata and the effective configuration.

use crate::cli::StatusArgs;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::Result;
use dcr_core::config::LayeredConfig;

pub fn execute(
    args: StatusArgs,
    storage: &Storage,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let meta = storage.local.metadata();

    if output.is_json() {
        let inspection: serde_json::Map<String, serde_json::Value> = config
            .to_inspection_map()
            .into_iter()
            .map(|(key, (value, source))| {
                (key, serde_json::json!({ "value": value, "source": format!("{source:?}") }))
            })
            .collect();

        return output.result(serde_json::json!({
            "metadata": meta,
            "config": inspection,
        }));
    }

    output.section("Store");
    output.kv("Location", config.storage_dir.value.display());
    output.kv("Schema version", meta.version);
    output.kv("Reports", meta.total_reports);
    output.kv("Last report number", meta.last_report_number);
    output.kv("Created", meta.created_at.format("%Y-%m-%d %H:%M UTC"));
    output.kv("Last modified", meta.last_modified.format("%Y-%m-%d %H:%M UTC"));

    output.section("Remote");
    match &config.remote_url.value {
        Some(url) => {
            output.kv("Store", url);
            output.kv("Timeout", format!("{}s", config.remote_timeout_secs.value));
        }
        None => output.kv("Store", "(offline)"),
    }

    if args.verbose {
        output.section("Configuration");
        let mut entries: Vec<_> = config.to_inspection_map().into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, (value, source)) in entries {
            output.kv(key, format!("{value} ({source:?})"));
        }

        output.section("Blobs");
        output.kv("Directory", storage.blobs_dir.display());
        output.kv("Present", if storage.blobs_dir.exists() { "yes" } else { "no" });
    }

    Ok(())
}
