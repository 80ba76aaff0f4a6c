//! ClickHouse error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClickhouseError {
    #[error("Database error: {0}")]
    Database(#[from] clickhouse::error::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Insert timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}
