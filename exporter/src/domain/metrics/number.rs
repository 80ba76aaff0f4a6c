//! Gauge and sum rows (number data points)

use std::sync::Arc;

use opentelemetry_proto::tonic::metrics::v1::NumberDataPoint;

use super::metadata::{MetricBase, MetricsMetaData, PointCommon};
use crate::encode::value::number_value_parts;
use crate::encode::{ExemplarColumns, convert_exemplars, resolve_value};

/// One gauge row
#[derive(Debug, Clone, PartialEq)]
pub struct NumberRecord {
    pub common: PointCommon,
    pub value: f64,
    pub exemplars: ExemplarColumns,
}

impl NumberRecord {
    pub fn new(meta: &Arc<MetricsMetaData>, metric: &MetricBase, dp: &NumberDataPoint) -> Self {
        let (int_value, double_value, value_type) = number_value_parts(dp.value.as_ref());

        Self {
            common: PointCommon::new(
                meta,
                metric,
                &dp.attributes,
                dp.start_time_unix_nano,
                dp.time_unix_nano,
                dp.flags,
            ),
            value: resolve_value(int_value, double_value, value_type),
            exemplars: convert_exemplars(&dp.exemplars),
        }
    }
}

/// One sum row
#[derive(Debug, Clone, PartialEq)]
pub struct SumRecord {
    pub point: NumberRecord,
    pub aggregation_temporality: i32,
    pub is_monotonic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use opentelemetry_proto::tonic::metrics::v1::{Exemplar, exemplar, number_data_point};

    fn meta() -> Arc<MetricsMetaData> {
        Arc::new(MetricsMetaData::default())
    }

    #[test]
    fn test_int_value_resolved() {
        let dp = NumberDataPoint {
            value: Some(number_data_point::Value::AsInt(100)),
            time_unix_nano: 1_704_067_200_000_000_000,
            ..Default::default()
        };

        let record = NumberRecord::new(&meta(), &MetricBase::default(), &dp);
        assert_eq!(record.value, 100.0);
        assert_eq!(record.common.time.timestamp(), 1_704_067_200);
        assert_eq!(record.exemplars, ExemplarColumns::default());
    }

    #[test]
    fn test_double_value_resolved() {
        let dp = NumberDataPoint {
            value: Some(number_data_point::Value::AsDouble(42.5)),
            ..Default::default()
        };
        let record = NumberRecord::new(&meta(), &MetricBase::default(), &dp);
        assert_eq!(record.value, 42.5);
    }

    #[test]
    fn test_unset_value_is_zero() {
        let record = NumberRecord::new(
            &meta(),
            &MetricBase::default(),
            &NumberDataPoint::default(),
        );
        assert_eq!(record.value, 0.0);
        assert_eq!(record.common.start_time, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_exemplars_columnized() {
        let dp = NumberDataPoint {
            value: Some(number_data_point::Value::AsInt(1)),
            exemplars: vec![
                Exemplar {
                    value: Some(exemplar::Value::AsDouble(0.5)),
                    ..Default::default()
                },
                Exemplar {
                    value: Some(exemplar::Value::AsInt(2)),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let record = NumberRecord::new(&meta(), &MetricBase::default(), &dp);
        assert_eq!(record.exemplars.row_count(), Some(2));
        assert_eq!(record.exemplars.values, Some(vec![0.5, 2.0]));
    }
}
