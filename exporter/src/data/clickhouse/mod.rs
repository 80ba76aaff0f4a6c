//! ClickHouse metrics storage
//!
//! Uses the HTTP interface with:
//! - LZ4 compression for efficient network transfer
//! - Async inserts for server-side batching
//! - HTTP keep-alive for connection reuse

pub mod error;
pub mod repositories;
pub mod statement;

pub use error::ClickhouseError;
pub use repositories::metric::MetricTables;
pub use statement::InsertStatement;

use std::time::Duration;

use clickhouse::Client;

use crate::core::config::ClickhouseConfig;
use crate::domain::metrics::MetricsBatch;

/// ClickHouse metrics service
///
/// Owns the configured client. The client pools connections internally, so one
/// service is shared by all inserts.
pub struct ClickhouseService {
    client: Client,
    timeout_secs: u64,
}

impl ClickhouseService {
    /// Build the client and verify the server is reachable
    pub async fn init(config: &ClickhouseConfig) -> Result<Self, ClickhouseError> {
        let service = Self::new(config);

        service.health_check().await.map_err(|e| {
            ClickhouseError::Connection(format!(
                "Failed to reach ClickHouse at {}: {}. Verify ClickHouse is running and accessible.",
                config.url, e
            ))
        })?;

        tracing::debug!(
            url = %config.url,
            database = %config.database,
            compression = %config.compression,
            async_insert = %config.async_insert,
            "ClickhouseService initialized"
        );

        Ok(service)
    }

    fn new(config: &ClickhouseConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        if let Some(ref user) = config.user {
            client = client.with_user(user);
        }
        if let Some(ref password) = config.password {
            client = client.with_password(password);
        }

        if config.compression {
            client = client.with_compression(clickhouse::Compression::Lz4);
        }

        if config.async_insert {
            client = client.with_option("async_insert", "1");
            // 0 = fire-and-forget, 1 = wait for flush
            let wait_value = if config.wait_for_async_insert {
                "1"
            } else {
                "0"
            };
            client = client.with_option("wait_for_async_insert", wait_value);
        }

        Self {
            client,
            timeout_secs: config.timeout_secs,
        }
    }

    /// Get the ClickHouse client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Health check - verify connection to ClickHouse
    pub async fn health_check(&self) -> Result<(), ClickhouseError> {
        self.client
            .query("SELECT 1")
            .execute()
            .await
            .map_err(ClickhouseError::from)
    }

    /// Insert a metrics batch, bounded by the configured timeout.
    ///
    /// Returns the number of rows written. Failed batches are not retried.
    pub async fn insert_metrics(
        &self,
        tables: &MetricTables,
        batch: &MetricsBatch,
    ) -> Result<usize, ClickhouseError> {
        let timeout_secs = self.timeout_secs;
        tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            repositories::metric::insert_batch(&self.client, tables, batch),
        )
        .await
        .map_err(|_| ClickhouseError::Timeout { timeout_secs })?
    }
}
