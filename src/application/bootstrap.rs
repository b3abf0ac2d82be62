use crate::application::store::TimeBlockStore;
use crate::infrastructure::config::{ensure_default_config, load_config, StoreConfig};
use crate::infrastructure::error::InfraError;
use crate::infrastructure::logging::init_tracing;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub struct BootstrapResult {
    pub config_path: PathBuf,
    pub config: StoreConfig,
    pub store: TimeBlockStore,
}

pub fn bootstrap(config_dir: &Path) -> Result<BootstrapResult, InfraError> {
    fs::create_dir_all(config_dir)?;
    let config_path = ensure_default_config(config_dir)?;
    let config = load_config(config_dir)?;
    let installed = init_tracing(&config)?;

    info!(
        config_path = %config_path.display(),
        log_filter = %config.log_filter,
        subscriber_installed = installed,
        "time block store bootstrapped"
    );

    Ok(BootstrapResult {
        config_path,
        config,
        store: TimeBlockStore::new(),
    })
}
