//! Histogram and exponential histogram rows

use std::sync::Arc;

use opentelemetry_proto::tonic::metrics::v1::{
    ExponentialHistogramDataPoint, HistogramDataPoint,
    exponential_histogram_data_point::Buckets,
};

use super::metadata::{MetricBase, MetricsMetaData, PointCommon};
use crate::encode::{ExemplarColumns, convert_exemplars};

/// One histogram row. Unset sum/min/max are stored as 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramRecord {
    pub common: PointCommon,
    pub count: u64,
    pub sum: f64,
    pub bucket_counts: Vec<u64>,
    pub explicit_bounds: Vec<f64>,
    pub exemplars: ExemplarColumns,
    pub min: f64,
    pub max: f64,
    pub aggregation_temporality: i32,
}

impl HistogramRecord {
    pub fn new(
        meta: &Arc<MetricsMetaData>,
        metric: &MetricBase,
        dp: &HistogramDataPoint,
        aggregation_temporality: i32,
    ) -> Self {
        Self {
            common: PointCommon::new(
                meta,
                metric,
                &dp.attributes,
                dp.start_time_unix_nano,
                dp.time_unix_nano,
                dp.flags,
            ),
            count: dp.count,
            sum: dp.sum.unwrap_or_default(),
            bucket_counts: dp.bucket_counts.clone(),
            explicit_bounds: dp.explicit_bounds.clone(),
            exemplars: convert_exemplars(&dp.exemplars),
            min: dp.min.unwrap_or_default(),
            max: dp.max.unwrap_or_default(),
            aggregation_temporality,
        }
    }
}

/// Offset and counts of one side of an exponential histogram
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSet {
    pub offset: i32,
    pub bucket_counts: Vec<u64>,
}

impl From<Option<&Buckets>> for BucketSet {
    fn from(buckets: Option<&Buckets>) -> Self {
        buckets
            .map(|b| BucketSet {
                offset: b.offset,
                bucket_counts: b.bucket_counts.clone(),
            })
            .unwrap_or_default()
    }
}

/// One exponential histogram row
#[derive(Debug, Clone, PartialEq)]
pub struct ExpHistogramRecord {
    pub common: PointCommon,
    pub count: u64,
    pub sum: f64,
    pub scale: i32,
    pub zero_count: u64,
    pub positive: BucketSet,
    pub negative: BucketSet,
    pub exemplars: ExemplarColumns,
    pub min: f64,
    pub max: f64,
    pub aggregation_temporality: i32,
}

impl ExpHistogramRecord {
    pub fn new(
        meta: &Arc<MetricsMetaData>,
        metric: &MetricBase,
        dp: &ExponentialHistogramDataPoint,
        aggregation_temporality: i32,
    ) -> Self {
        Self {
            common: PointCommon::new(
                meta,
                metric,
                &dp.attributes,
                dp.start_time_unix_nano,
                dp.time_unix_nano,
                dp.flags,
            ),
            count: dp.count,
            sum: dp.sum.unwrap_or_default(),
            scale: dp.scale,
            zero_count: dp.zero_count,
            positive: BucketSet::from(dp.positive.as_ref()),
            negative: BucketSet::from(dp.negative.as_ref()),
            exemplars: convert_exemplars(&dp.exemplars),
            min: dp.min.unwrap_or_default(),
            max: dp.max.unwrap_or_default(),
            aggregation_temporality,
        }
    }
}
