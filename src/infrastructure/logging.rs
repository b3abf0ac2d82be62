use crate::infrastructure::config::StoreConfig;
use crate::infrastructure::error::InfraError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const MAX_FILTER_LEN: usize = 4096;

pub fn select_filter_directive(env: Option<&str>, configured: &str) -> Result<String, InfraError> {
    let from_env = env
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && raw.len() <= MAX_FILTER_LEN)
        .filter(|raw| EnvFilter::try_new(raw).is_ok());
    if let Some(directive) = from_env {
        return Ok(directive.to_string());
    }

    EnvFilter::try_new(configured).map_err(|error| {
        InfraError::InvalidConfig(format!("invalid logFilter '{configured}': {error}"))
    })?;
    Ok(configured.to_string())
}

// Returns `false` when a global subscriber was already set.
pub fn init_tracing(config: &StoreConfig) -> Result<bool, InfraError> {
    let env = std::env::var("RUST_LOG").ok();
    let directive = select_filter_directive(env.as_deref(), &config.log_filter)?;
    let filter = EnvFilter::try_new(&directive).map_err(|error| {
        InfraError::InvalidConfig(format!("invalid log filter '{directive}': {error}"))
    })?;

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(config.log_ansi))
        .with(filter)
        .try_init()
        .is_ok();
    Ok(installed)
}
