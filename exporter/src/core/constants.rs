// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "chmetrics";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "chmetrics.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "CHMETRICS_CONFIG";

// =============================================================================
// Environment Variables - Logging
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "CHMETRICS_LOG";

/// Default log filter when neither CHMETRICS_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info,chmetrics_exporter=info";

// =============================================================================
// Environment Variables - ClickHouse
// =============================================================================

/// Environment variable for ClickHouse URL
pub const ENV_CLICKHOUSE_URL: &str = "CHMETRICS_CLICKHOUSE_URL";

/// Environment variable for ClickHouse database
pub const ENV_CLICKHOUSE_DATABASE: &str = "CHMETRICS_CLICKHOUSE_DATABASE";

/// Environment variable for ClickHouse user
pub const ENV_CLICKHOUSE_USER: &str = "CHMETRICS_CLICKHOUSE_USER";

/// Environment variable for ClickHouse password
pub const ENV_CLICKHOUSE_PASSWORD: &str = "CHMETRICS_CLICKHOUSE_PASSWORD";

/// Environment variable for the metric table prefix
pub const ENV_METRICS_TABLE_PREFIX: &str = "CHMETRICS_METRICS_TABLE_PREFIX";

// =============================================================================
// ClickHouse Defaults
// =============================================================================

/// Default ClickHouse HTTP endpoint
pub const CLICKHOUSE_DEFAULT_URL: &str = "http://localhost:8123";

/// Default ClickHouse database name
pub const CLICKHOUSE_DEFAULT_DATABASE: &str = "otel";

/// Default insert timeout in seconds
pub const CLICKHOUSE_DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Metrics Defaults
// =============================================================================

/// Default metric table prefix (`<prefix>_gauge`, `<prefix>_sum`, ...)
pub const METRICS_DEFAULT_TABLE_PREFIX: &str = "otel_metrics";
