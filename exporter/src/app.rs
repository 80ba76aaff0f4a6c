//! Core application

use std::path::Path;

use anyhow::{Context, Result};
use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;

use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::data::clickhouse::{ClickhouseService, InsertStatement, MetricTables};
use crate::domain::metrics::{MetricsBatch, extract_metrics_batch};
use crate::utils::otlp::{OtlpFormat, read_request};

pub struct CoreApp {
    pub config: AppConfig,
    pub tables: MetricTables,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;
        let (file, format) = command.payload();
        let batch = Self::load_batch(file, format).await?;

        match command {
            Commands::Export { .. } => app.export(&batch).await,
            Commands::Inspect { .. } => {
                app.inspect(&batch);
                Ok(())
            }
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let tables = MetricTables::from_prefix(&config.metrics.table_prefix);
        Ok(Self { config, tables })
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Decode a payload file and build its rows
    async fn load_batch(file: &Path, format: OtlpFormat) -> Result<MetricsBatch> {
        let request: ExportMetricsServiceRequest = read_request(file, format)
            .await
            .with_context(|| format!("Failed to decode {} payload", format))?;

        let batch = extract_metrics_batch(&request);
        batch.log_summary();
        Ok(batch)
    }

    async fn export(&self, batch: &MetricsBatch) -> Result<()> {
        if batch.has_incomplete_input() {
            tracing::warn!(
                skipped_metrics = batch.skipped_metrics,
                unset_values = batch.unset_values,
                "Payload was not fully decoded; affected metrics are missing or written as 0"
            );
        }
        if batch.is_empty() {
            tracing::info!("No metric data points to export");
            return Ok(());
        }

        let service = ClickhouseService::init(&self.config.clickhouse)
            .await
            .context("Failed to initialize ClickHouse")?;

        let written = service
            .insert_metrics(&self.tables, batch)
            .await
            .context("Failed to insert metrics")?;

        tracing::info!(
            rows = written,
            database = %self.config.clickhouse.database,
            "Exported metrics"
        );
        Ok(())
    }

    fn inspect(&self, batch: &MetricsBatch) {
        let rows = [
            (&self.tables.gauge, batch.gauge.len()),
            (&self.tables.sum, batch.sum.len()),
            (&self.tables.histogram, batch.histogram.len()),
            (&self.tables.exp_histogram, batch.exp_histogram.len()),
            (&self.tables.summary, batch.summary.len()),
        ];
        for (table, count) in rows {
            println!("{table}: {count} rows");
        }
        if batch.skipped_metrics > 0 {
            println!("skipped metrics without data: {}", batch.skipped_metrics);
        }
        if batch.unset_values > 0 {
            println!("points with unset value: {}", batch.unset_values);
        }

        let statements = InsertStatement::for_batch(&self.tables, batch)
            .into_iter()
            .chain(InsertStatement::exemplars_for_batch(&self.tables, batch));
        for stmt in statements {
            println!();
            println!("-- {} params", stmt.param_count());
            println!("{stmt}");
        }
    }
}
