use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    CLICKHOUSE_DEFAULT_DATABASE, CLICKHOUSE_DEFAULT_TIMEOUT_SECS, CLICKHOUSE_DEFAULT_URL,
    CONFIG_FILE_NAME, METRICS_DEFAULT_TABLE_PREFIX,
};

// =============================================================================
// File Config (JSON)
// =============================================================================

/// ClickHouse configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClickhouseFileConfig {
    /// ClickHouse connection URL (or use CHMETRICS_CLICKHOUSE_URL env var)
    pub url: Option<String>,
    /// Database name (default: "otel")
    pub database: Option<String>,
    /// Username for authentication
    pub user: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Insert timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Enable LZ4 compression (default: true)
    pub compression: Option<bool>,
    /// Enable async inserts (default: true)
    pub async_insert: Option<bool>,
    /// Wait for async insert completion (default: false)
    pub wait_for_async_insert: Option<bool>,
}

/// Metrics configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MetricsFileConfig {
    pub table_prefix: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub clickhouse: Option<ClickhouseFileConfig>,
    pub metrics: Option<MetricsFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

/// ClickHouse configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct ClickhouseConfig {
    /// ClickHouse connection URL
    pub url: String,
    /// Database name
    pub database: String,
    /// Username for authentication
    pub user: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
    /// Insert timeout in seconds
    pub timeout_secs: u64,
    /// Enable LZ4 compression for requests/responses
    pub compression: bool,
    /// Enable async inserts
    pub async_insert: bool,
    /// Wait for async insert to complete (false = fire-and-forget)
    pub wait_for_async_insert: bool,
}

/// Metrics configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Table prefix; tables are `<prefix>_gauge`, `<prefix>_sum`, ...
    pub table_prefix: String,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clickhouse: ClickhouseConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let config_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let file_config = match config_path {
            Some(path) => {
                let config = FileConfig::load_from_file(&path)?;
                config.warn_unknown_fields();
                config
            }
            None => FileConfig::default(),
        };

        let config = Self::layer(cli, file_config);
        config.validate()?;

        tracing::debug!(
            url = %config.clickhouse.url,
            database = %config.clickhouse.database,
            table_prefix = %config.metrics.table_prefix,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_clickhouse = file_config.clickhouse.unwrap_or_default();
        let file_metrics = file_config.metrics.unwrap_or_default();

        let clickhouse = ClickhouseConfig {
            url: cli
                .clickhouse_url
                .clone()
                .or(file_clickhouse.url)
                .unwrap_or_else(|| CLICKHOUSE_DEFAULT_URL.to_string()),
            database: cli
                .clickhouse_database
                .clone()
                .or(file_clickhouse.database)
                .unwrap_or_else(|| CLICKHOUSE_DEFAULT_DATABASE.to_string()),
            user: cli.clickhouse_user.clone().or(file_clickhouse.user),
            password: cli.clickhouse_password.clone().or(file_clickhouse.password),
            timeout_secs: file_clickhouse
                .timeout_secs
                .unwrap_or(CLICKHOUSE_DEFAULT_TIMEOUT_SECS),
            compression: file_clickhouse.compression.unwrap_or(true),
            async_insert: file_clickhouse.async_insert.unwrap_or(true),
            wait_for_async_insert: file_clickhouse.wait_for_async_insert.unwrap_or(false),
        };

        let metrics = MetricsConfig {
            table_prefix: cli
                .table_prefix
                .clone()
                .or(file_metrics.table_prefix)
                .unwrap_or_else(|| METRICS_DEFAULT_TABLE_PREFIX.to_string()),
        };

        Self {
            clickhouse,
            metrics,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.clickhouse.url.is_empty() {
            anyhow::bail!("Configuration error: clickhouse.url must not be empty");
        }
        if self.clickhouse.database.is_empty() {
            anyhow::bail!("Configuration error: clickhouse.database must not be empty");
        }
        if self.clickhouse.timeout_secs == 0 {
            anyhow::bail!("Configuration error: clickhouse.timeout_secs must be greater than 0");
        }
        let prefix = &self.metrics.table_prefix;
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            anyhow::bail!(
                "Configuration error: metrics.table_prefix '{}' must be non-empty and contain only [A-Za-z0-9_]",
                prefix
            );
        }
        Ok(())
    }
}
