//! Summary rows

use std::sync::Arc;

use opentelemetry_proto::tonic::metrics::v1::SummaryDataPoint;

use super::metadata::{MetricBase, MetricsMetaData, PointCommon};
use crate::encode::{QuantileColumns, convert_quantiles};

/// One summary row
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub common: PointCommon,
    pub count: u64,
    pub sum: f64,
    pub quantiles: QuantileColumns,
}

impl SummaryRecord {
    pub fn new(meta: &Arc<MetricsMetaData>, metric: &MetricBase, dp: &SummaryDataPoint) -> Self {
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
            sum: dp.sum,
            quantiles: convert_quantiles(&dp.quantile_values),
        }
    }
}
