use crate::domain::error::ValidationError;
use crate::domain::models::{BlockCategory, TimeBlock};
use crate::infrastructure::error::InfraError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_JSON: &str = "timeblocks.json";
const CONFIG_SCHEMA: u8 = 1;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub schema: u8,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "default_log_ansi")]
    pub log_ansi: bool,
    #[serde(default)]
    pub default_category: BlockCategory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schema: CONFIG_SCHEMA,
            log_filter: default_log_filter(),
            log_ansi: default_log_ansi(),
            default_category: BlockCategory::default(),
        }
    }
}

impl StoreConfig {
    pub fn new_block(
        &self,
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<TimeBlock, ValidationError> {
        Ok(TimeBlock::new(id, start_time, end_time)?.with_category(self.default_category.clone()))
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_log_ansi() -> bool {
    true
}

pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_JSON)
}

pub fn ensure_default_config(config_dir: &Path) -> Result<PathBuf, InfraError> {
    let path = config_path(config_dir);
    if !path.exists() {
        let formatted = serde_json::to_string_pretty(&StoreConfig::default())?;
        fs::write(&path, format!("{formatted}\n"))?;
        info!(path = %path.display(), "default time block config written");
    }
    Ok(path)
}

fn read_config(path: &Path) -> Result<serde_json::Value, InfraError> {
    let raw = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| InfraError::InvalidConfig(format!("missing schema in {}", path.display())))?;
    if schema != u64::from(CONFIG_SCHEMA) {
        return Err(InfraError::InvalidConfig(format!(
            "unsupported schema {} in {}",
            schema,
            path.display()
        )));
    }
    Ok(parsed)
}

pub fn load_config(config_dir: &Path) -> Result<StoreConfig, InfraError> {
    let path = config_path(config_dir);
    let mut config: StoreConfig = serde_json::from_value(read_config(&path)?)?;
    let log_filter = config.log_filter.trim();
    config.log_filter = if log_filter.is_empty() {
        default_log_filter()
    } else {
        log_filter.to_string()
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_TEMP_WORKSPACE: AtomicUsize = AtomicUsize::new(0);

    struct TempWorkspace {
        path: PathBuf,
    }

    impl TempWorkspace {
        fn new() -> Self {
            let sequence = NEXT_TEMP_WORKSPACE.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "timeblock-config-tests-{}-{}",
                std::process::id(),
                sequence
            ));
            fs::create_dir_all(&path).expect("create temp workspace");
            Self { path }
        }
    }

    impl Drop for TempWorkspace {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn default_config_is_written_and_loaded() {
        let workspace = TempWorkspace::new();
        let path = ensure_default_config(&workspace.path).expect("write default config");
        assert!(path.exists());

        let raw = fs::read_to_string(&path).expect("read config");
        assert!(raw.contains("\"logFilter\""));
        assert!(raw.ends_with('\n'));

        let config = load_config(&workspace.path).expect("load config");
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let workspace = TempWorkspace::new();
        fs::write(
            config_path(&workspace.path),
            r#"{"schema": 1, "logFilter": "debug", "defaultCategory": "meeting"}"#,
        )
        .expect("write config");

        ensure_default_config(&workspace.path).expect("ensure config");
        let config = load_config(&workspace.path).expect("load config");

        assert_eq!(config.log_filter, "debug");
        assert!(config.log_ansi);
        assert_eq!(config.default_category, BlockCategory::Meeting);
    }

    #[test]
    fn blank_log_filter_falls_back_to_default() {
        let workspace = TempWorkspace::new();
        fs::write(
            config_path(&workspace.path),
            r#"{"schema": 1, "logFilter": "   "}"#,
        )
        .expect("write config");

        let config = load_config(&workspace.path).expect("load config");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn unsupported_schema_is_rejected() {
        let workspace = TempWorkspace::new();
        fs::write(config_path(&workspace.path), r#"{"schema": 7}"#).expect("write config");

        match load_config(&workspace.path) {
            Err(InfraError::InvalidConfig(message)) => assert!(message.contains("unsupported schema 7")),
            other => panic!("expected invalid config error, got {other:?}"),
        }
    }

    #[test]
    fn schema_beyond_u8_range_is_rejected() {
        let workspace = TempWorkspace::new();
        fs::write(config_path(&workspace.path), r#"{"schema": 257}"#).expect("write config");

        match load_config(&workspace.path) {
            Err(InfraError::InvalidConfig(message)) => assert!(message.contains("unsupported schema 257")),
            other => panic!("expected invalid config error, got {other:?}"),
        }
        assert_eq!(StoreConfig::default().schema, CONFIG_SCHEMA);
    }

    #[test]
    fn missing_schema_is_rejected() {
        let workspace = TempWorkspace::new();
        fs::write(config_path(&workspace.path), r#"{"logFilter": "info"}"#).expect("write config");
        assert!(matches!(
            load_config(&workspace.path),
            Err(InfraError::InvalidConfig(_))
        ));
    }

    #[test]
    fn new_block_uses_default_category() {
        let config = StoreConfig {
            default_category: BlockCategory::Custom("errands".to_string()),
            ..StoreConfig::default()
        };
        let start = DateTime::parse_from_rfc3339("2026-02-16T09:00:00Z")
            .expect("valid datetime")
            .with_timezone(&Utc);

        let block = config
            .new_block("blk-1", start, start + chrono::Duration::minutes(25))
            .expect("valid block");
        assert_eq!(block.category().as_str(), "errands");
        assert!(config.new_block("blk-2", start, start).is_err());
    }
}
