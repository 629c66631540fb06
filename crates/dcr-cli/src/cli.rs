use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DCR - Field reporting for road-maintenance interventions
#[derive(Parser, Debug)]
#[command(name = "dcr")]
#[command(about = "Field reporting for road-maintenance interventions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Root directory of the local store
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Base URL of the remote document store
    #[arg(long, global = true)]
    pub remote_url: Option<String>,

    /// Skip the remote store entirely for this invocation
    #[arg(long, global = true)]
    pub offline: bool,

    /// Configuration file (defaults to ./dcr.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User recorded on created and updated reports
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the local store (runs the one-time legacy import)
    Init,

    /// Record a new intervention report
    New(NewArgs),

    /// List reports from the secondary index
    List(ListArgs),

    /// Show one report in full
    Show(ShowArgs),

    /// Search reports with filters
    Search(SearchArgs),

    /// Update an existing report
    Update(UpdateArgs),

    /// Delete a report from both stores
    Delete(DeleteArgs),

    /// Aggregate statistics over all reports
    Stats,

    /// Render a report into a document
    Export(ExportArgs),

    /// Whole-database export and import
    Db(DbArgs),

    /// Show store metadata and effective configuration
    Status(StatusArgs),
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Region of the intervention
    #[arg(long)]
    pub region: String,

    #[arg(long, default_value = "")]
    pub province: String,

    #[arg(long, default_value = "")]
    pub municipality: String,

    #[arg(long, default_value = "")]
    pub district: String,

    #[arg(long, default_value = "")]
    pub sector: String,

    /// Intervention classification (e.g. "Bacheo")
    #[arg(long)]
    pub intervention: String,

    #[arg(long)]
    pub subtype: Option<String>,

    #[arg(long)]
    pub observations: Option<String>,

    /// Metric as key=value; repeatable
    #[arg(long = "metric", value_name = "KEY=VALUE")]
    pub metrics: Vec<String>,

    /// Start coordinate as "lat,lon"
    #[arg(long, value_name = "LAT,LON")]
    pub gps_start: Option<String>,

    /// End coordinate as "lat,lon"
    #[arg(long, value_name = "LAT,LON")]
    pub gps_end: Option<String>,

    /// Image reference (URL or data URI); repeatable
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Video reference; repeatable
    #[arg(long = "video")]
    pub videos: Vec<String>,

    /// Document reference; repeatable
    #[arg(long = "document")]
    pub documents: Vec<String>,

    /// Initial status (defaults to pending)
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Render a document right after saving (pdf, excel, word); repeatable
    #[arg(long = "export", value_name = "KIND")]
    pub export_kinds: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show at most this many entries
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Report number (DCR-YYYY-NNNNNN)
    pub number: String,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Free text matched against number, type, observations, municipality,
    /// and province
    pub text: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub province: Option<String>,

    #[arg(long)]
    pub municipality: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    /// Creator user id
    #[arg(long = "by")]
    pub created_by: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Substring of the intervention type
    #[arg(long = "type")]
    pub intervention_type: Option<String>,

    /// Created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Report number (DCR-YYYY-NNNNNN)
    pub number: String,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub observations: Option<String>,

    /// Replace all metrics with the given key=value pairs; repeatable
    #[arg(long = "metric", value_name = "KEY=VALUE")]
    pub metrics: Vec<String>,

    #[arg(long, value_name = "LAT,LON")]
    pub gps_start: Option<String>,

    #[arg(long, value_name = "LAT,LON")]
    pub gps_end: Option<String>,

    #[arg(long)]
    pub subtype: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Report number (DCR-YYYY-NNNNNN)
    pub number: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Report number (DCR-YYYY-NNNNNN)
    pub number: String,

    /// Document kind: pdf, excel, or word
    #[arg(long, default_value = "word")]
    pub kind: String,

    /// Write the document here instead of the blob directory
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Write the whole local database to one JSON file
    Export(DbExportArgs),

    /// Replace the whole local database from an exported JSON file
    Import(DbImportArgs),
}

#[derive(Parser, Debug)]
pub struct DbExportArgs {
    /// Output path
    pub out: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DbImportArgs {
    /// Exported database file
    pub path: PathBuf,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show detailed status
    #[arg(long)]
    pub verbose: bool,
}
