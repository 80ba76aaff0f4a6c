//! Storage backends

pub mod clickhouse;
