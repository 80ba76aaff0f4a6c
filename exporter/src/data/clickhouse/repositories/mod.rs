//! ClickHouse repository modules
//!
//! - **metric**: Batch insert operations for the five metric tables

pub mod metric;
