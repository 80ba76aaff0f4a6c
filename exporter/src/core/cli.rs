use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    APP_NAME_LOWER, ENV_CLICKHOUSE_DATABASE, ENV_CLICKHOUSE_PASSWORD, ENV_CLICKHOUSE_URL,
    ENV_CLICKHOUSE_USER, ENV_CONFIG, ENV_METRICS_TABLE_PREFIX,
};
use crate::utils::otlp::OtlpFormat;

#[derive(Parser)]
#[command(name = APP_NAME_LOWER)]
#[command(version, about = "Write OTLP metrics into ClickHouse", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// ClickHouse connection URL
    #[arg(long, global = true, env = ENV_CLICKHOUSE_URL)]
    pub clickhouse_url: Option<String>,

    /// ClickHouse database name
    #[arg(long, global = true, env = ENV_CLICKHOUSE_DATABASE)]
    pub clickhouse_database: Option<String>,

    /// ClickHouse user
    #[arg(long, global = true, env = ENV_CLICKHOUSE_USER)]
    pub clickhouse_user: Option<String>,

    /// ClickHouse password
    #[arg(long, global = true, env = ENV_CLICKHOUSE_PASSWORD, hide_env_values = true)]
    pub clickhouse_password: Option<String>,

    /// Metric table prefix
    #[arg(long, global = true, env = ENV_METRICS_TABLE_PREFIX)]
    pub table_prefix: Option<String>,
}

/// Parse payload format from CLI string
fn parse_format(s: &str) -> Result<OtlpFormat, String> {
    match s.to_lowercase().as_str() {
        "protobuf" | "proto" | "pb" => Ok(OtlpFormat::Protobuf),
        "json" => Ok(OtlpFormat::Json),
        _ => Err(format!(
            "Invalid format '{}'. Valid options: protobuf, json",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Decode an OTLP metrics export file and insert it into ClickHouse
    Export {
        /// ExportMetricsServiceRequest payload
        file: PathBuf,

        /// Payload encoding (inferred from the file extension when omitted)
        #[arg(long, short = 'f', value_parser = parse_format)]
        format: Option<OtlpFormat>,
    },
    /// Decode a payload and print the rows and INSERT statements it would produce
    Inspect {
        /// ExportMetricsServiceRequest payload
        file: PathBuf,

        /// Payload encoding (inferred from the file extension when omitted)
        #[arg(long, short = 'f', value_parser = parse_format)]
        format: Option<OtlpFormat>,
    },
}

impl Commands {
    /// Payload path and resolved format
    pub fn payload(&self) -> (&PathBuf, OtlpFormat) {
        match self {
            Commands::Export { file, format } | Commands::Inspect { file, format } => {
                (file, format.unwrap_or_else(|| OtlpFormat::from_path(file)))
            }
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub clickhouse_url: Option<String>,
    pub clickhouse_database: Option<String>,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub table_prefix: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        clickhouse_url: cli.clickhouse_url,
        clickhouse_database: cli.clickhouse_database,
        clickhouse_user: cli.clickhouse_user,
        clickhouse_password: cli.clickhouse_password,
        table_prefix: cli.table_prefix,
    };
    (config, cli.command)
}
