//! Command implementations

mod db;
mod delete;
mod export;
mod init;
mod list;
mod new;
mod search;
mod show;
mod stats;
mod status;
mod update;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use crate::storage::{self, Storage};
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = storage::load_config(&cli)?;
    let storage = Storage::connect(&config)?;

    match cli.command {
        Commands::Init => init::execute(&storage, &config, &output),
        Commands::New(args) => new::execute(args, &storage, &config, &output).await,
        Commands::List(args) => list::execute(args, &storage, &output),
        Commands::Show(args) => show::execute(args, &storage, &output).await,
        Commands::Search(args) => search::execute(args, &storage, &output),
        Commands::Update(args) => update::execute(args, &storage, &config, &output).await,
        Commands::Delete(args) => delete::execute(args, &storage, &output).await,
        Commands::Stats => stats::execute(&storage, &output).await,
        Commands::Export(args) => export::execute(args, &storage, &output).await,
        Commands::Db(args) => db::execute(args, &storage, &output),
        Commands::Status(args) => status::execute(args, &storage, &config, &output),
    }
}
