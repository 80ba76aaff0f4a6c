//! Metrics row building
//!
//! Flattens OTLP metrics into one record per data point.
//! Supports all 5 OTLP metric types: Gauge, Sum, Histogram, ExponentialHistogram, Summary.

mod extract;
mod histogram;
mod metadata;
mod number;
mod summary;

pub use extract::{MetricsBatch, extract_metrics_batch};
pub use histogram::{BucketSet, ExpHistogramRecord, HistogramRecord};
pub use metadata::{MetricBase, MetricsMetaData, PointCommon};
pub use number::{NumberRecord, SumRecord};
pub use summary::SummaryRecord;
