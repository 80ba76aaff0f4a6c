//! OTLP metrics to ClickHouse column encoding

pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod encode;
pub mod utils;
