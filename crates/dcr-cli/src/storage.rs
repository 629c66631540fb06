use crate::cli::Cli;
use anyhow::{Context, Result};
use dcr_core::config::{CliConfigOverrides, LayeredConfig};
use dcr_export::DocxExporter;
use dcr_store::kv::FileKv;
use dcr_store::local::LocalStore;
use dcr_store::remote::HttpRemoteStore;
use dcr_store::ReportService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Resolve the layered configuration: defaults, then dcr.toml, then
/// DCR_* environment variables, then the global CLI flags.
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    let config_path = cli.config.clone().or_else(|| {
        let default = PathBuf::from("dcr.toml");
        default.exists().then_some(default)
    });
    if let Some(path) = config_path {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        storage_dir: cli.storage_dir.clone(),
        remote_url: cli.remote_url.clone(),
        offline: cli.offline,
        user: cli.user.clone(),
    });

    Ok(config)
}

/// Wired stores and service for one invocation
pub struct Storage {
    pub local: Arc<LocalStore>,
    pub service: ReportService,
    pub blobs_dir: PathBuf,
}

impl Storage {
    pub fn connect(config: &LayeredConfig) -> Result<Self> {
        let root = &config.storage_dir.value;
        let kv = Arc::new(FileKv::open(root).with_context(|| {
            format!("Failed to open local store at {}", root.display())
        })?);
        let local = Arc::new(LocalStore::open(kv).context("Failed to load local store")?);

        let mut service =
            ReportService::new(local.clone()).with_exporter(Arc::new(DocxExporter::new()));

        if let Some(url) = &config.remote_url.value {
            let remote = HttpRemoteStore::new(
                url,
                Duration::from_secs(config.remote_timeout_secs.value),
            )
            .context("Failed to configure remote store")?;
            service = service.with_remote(Arc::new(remote));
        }

        Ok(Self {
            local,
            service,
            blobs_dir: root.join("blobs"),
        })
    }
}
