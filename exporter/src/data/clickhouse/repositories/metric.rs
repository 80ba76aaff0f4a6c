//! ClickHouse metric repository
//!
//! One table per metric kind, laid out like the OpenTelemetry collector's ClickHouse
//! exporter schema. Map columns are written as key-sorted `(key, value)` pairs and
//! `Exemplars.*` / `ValueAtQuantiles.*` nested columns as parallel arrays.

use clickhouse::Client;
use clickhouse::Row;
use serde::Serialize;

use crate::data::clickhouse::ClickhouseError;
use crate::domain::metrics::{
    ExpHistogramRecord, HistogramRecord, MetricsBatch, NumberRecord, PointCommon, SumRecord,
    SummaryRecord,
};
use crate::encode::{ExemplarColumns, map_entries};
use crate::utils::time::{chrono_to_time, datetime_to_nanos};

/// Table names for one table prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricTables {
    pub gauge: String,
    pub sum: String,
    pub histogram: String,
    pub exp_histogram: String,
    pub summary: String,
}

impl MetricTables {
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            gauge: format!("{prefix}_gauge"),
            sum: format!("{prefix}_sum"),
            histogram: format!("{prefix}_histogram"),
            exp_histogram: format!("{prefix}_exponential_histogram"),
            summary: format!("{prefix}_summary"),
        }
    }
}

type MapEntries = Vec<(String, String)>;

/// Defines a row struct with the columns shared by every metric table followed by
/// the kind-specific ones, and its `From<&Record>` conversion.
macro_rules! metric_row {
    (
        $(#[$meta:meta])*
        $name:ident from $record:ty, |$r:ident| $common:expr, {
            $($(#[$fmeta:meta])* $field:ident: $ty:ty = $init:expr,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Row, Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct $name {
            resource_attributes: MapEntries,
            resource_schema_url: String,
            scope_name: String,
            scope_version: String,
            scope_attributes: MapEntries,
            scope_dropped_attr_count: u32,
            scope_schema_url: String,
            service_name: String,
            metric_name: String,
            metric_description: String,
            metric_unit: String,
            attributes: MapEntries,
            #[serde(with = "clickhouse::serde::time::datetime64::nanos")]
            start_time_unix: time::OffsetDateTime,
            #[serde(with = "clickhouse::serde::time::datetime64::nanos")]
            time_unix: time::OffsetDateTime,
            flags: u32,
            $($(#[$fmeta])* $field: $ty,)*
        }

        impl From<&$record> for $name {
            fn from($r: &$record) -> Self {
                let common: &PointCommon = $common;
                let meta = &common.metadata;
                Self {
                    resource_attributes: map_entries(&meta.resource_attributes),
                    resource_schema_url: meta.resource_schema_url.clone(),
                    scope_name: meta.scope_name.clone(),
                    scope_version: meta.scope_version.clone(),
                    scope_attributes: map_entries(&meta.scope_attributes),
                    scope_dropped_attr_count: meta.scope_dropped_attr_count,
                    scope_schema_url: meta.scope_schema_url.clone(),
                    service_name: meta.service_name.clone(),
                    metric_name: common.metric.name.clone(),
                    metric_description: common.metric.description.clone(),
                    metric_unit: common.metric.unit.clone(),
                    attributes: map_entries(&common.attributes),
                    start_time_unix: chrono_to_time(common.start_time),
                    time_unix: chrono_to_time(common.time),
                    flags: common.flags,
                    $($field: $init,)*
                }
            }
        }
    };
}

// ============================================================================
// Exemplar arrays
// ============================================================================

fn exemplar_attributes(exemplars: &ExemplarColumns) -> Vec<MapEntries> {
    exemplars
        .filtered_attributes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(map_entries)
        .collect()
}

/// DateTime64(9) array elements, as nanoseconds
fn exemplar_times(exemplars: &ExemplarColumns) -> Vec<i64> {
    exemplars
        .times
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|t| datetime_to_nanos(*t))
        .collect()
}

fn or_empty<T: Clone>(column: &Option<Vec<T>>) -> Vec<T> {
    column.clone().unwrap_or_default()
}

// ============================================================================
// Rows
// ============================================================================

metric_row! {
    /// Row of `<prefix>_gauge`
    GaugeRow from NumberRecord, |r| &r.common, {
        value: f64 = r.value,
        #[serde(rename = "Exemplars.FilteredAttributes")]
        exemplars_filtered_attributes: Vec<MapEntries> = exemplar_attributes(&r.exemplars),
        #[serde(rename = "Exemplars.TimeUnix")]
        exemplars_time_unix: Vec<i64> = exemplar_times(&r.exemplars),
        #[serde(rename = "Exemplars.Value")]
        exemplars_value: Vec<f64> = or_empty(&r.exemplars.values),
        #[serde(rename = "Exemplars.SpanId")]
        exemplars_span_id: Vec<String> = or_empty(&r.exemplars.span_ids),
        #[serde(rename = "Exemplars.TraceId")]
        exemplars_trace_id: Vec<String> = or_empty(&r.exemplars.trace_ids),
    }
}

metric_row! {
    /// Row of `<prefix>_sum`
    SumRow from SumRecord, |r| &r.point.common, {
        value: f64 = r.point.value,
        #[serde(rename = "Exemplars.FilteredAttributes")]
        exemplars_filtered_attributes: Vec<MapEntries> = exemplar_attributes(&r.point.exemplars),
        #[serde(rename = "Exemplars.TimeUnix")]
        exemplars_time_unix: Vec<i64> = exemplar_times(&r.point.exemplars),
        #[serde(rename = "Exemplars.Value")]
        exemplars_value: Vec<f64> = or_empty(&r.point.exemplars.values),
        #[serde(rename = "Exemplars.SpanId")]
        exemplars_span_id: Vec<String> = or_empty(&r.point.exemplars.span_ids),
        #[serde(rename = "Exemplars.TraceId")]
        exemplars_trace_id: Vec<String> = or_empty(&r.point.exemplars.trace_ids),
        aggregation_temporality: i32 = r.aggregation_temporality,
        is_monotonic: bool = r.is_monotonic,
    }
}

metric_row! {
    /// Row of `<prefix>_histogram`
    HistogramRow from HistogramRecord, |r| &r.common, {
        count: u64 = r.count,
        sum: f64 = r.sum,
        bucket_counts: Vec<u64> = r.bucket_counts.clone(),
        explicit_bounds: Vec<f64> = r.explicit_bounds.clone(),
        #[serde(rename = "Exemplars.FilteredAttributes")]
        exemplars_filtered_attributes: Vec<MapEntries> = exemplar_attributes(&r.exemplars),
        #[serde(rename = "Exemplars.TimeUnix")]
        exemplars_time_unix: Vec<i64> = exemplar_times(&r.exemplars),
        #[serde(rename = "Exemplars.Value")]
        exemplars_value: Vec<f64> = or_empty(&r.exemplars.values),
        #[serde(rename = "Exemplars.SpanId")]
        exemplars_span_id: Vec<String> = or_empty(&r.exemplars.span_ids),
        #[serde(rename = "Exemplars.TraceId")]
        exemplars_trace_id: Vec<String> = or_empty(&r.exemplars.trace_ids),
        min: f64 = r.min,
        max: f64 = r.max,
        aggregation_temporality: i32 = r.aggregation_temporality,
    }
}

metric_row! {
    /// Row of `<prefix>_exponential_histogram`
    ExpHistogramRow from ExpHistogramRecord, |r| &r.common, {
        count: u64 = r.count,
        sum: f64 = r.sum,
        scale: i32 = r.scale,
        zero_count: u64 = r.zero_count,
        positive_offset: i32 = r.positive.offset,
        positive_bucket_counts: Vec<u64> = r.positive.bucket_counts.clone(),
        negative_offset: i32 = r.negative.offset,
        negative_bucket_counts: Vec<u64> = r.negative.bucket_counts.clone(),
        #[serde(rename = "Exemplars.FilteredAttributes")]
        exemplars_filtered_attributes: Vec<MapEntries> = exemplar_attributes(&r.exemplars),
        #[serde(rename = "Exemplars.TimeUnix")]
        exemplars_time_unix: Vec<i64> = exemplar_times(&r.exemplars),
        #[serde(rename = "Exemplars.Value")]
        exemplars_value: Vec<f64> = or_empty(&r.exemplars.values),
        #[serde(rename = "Exemplars.SpanId")]
        exemplars_span_id: Vec<String> = or_empty(&r.exemplars.span_ids),
        #[serde(rename = "Exemplars.TraceId")]
        exemplars_trace_id: Vec<String> = or_empty(&r.exemplars.trace_ids),
        min: f64 = r.min,
        max: f64 = r.max,
        aggregation_temporality: i32 = r.aggregation_temporality,
    }
}

metric_row! {
    /// Row of `<prefix>_summary`
    SummaryRow from SummaryRecord, |r| &r.common, {
        count: u64 = r.count,
        sum: f64 = r.sum,
        #[serde(rename = "ValueAtQuantiles.Quantile")]
        value_at_quantiles_quantile: Vec<f64> = or_empty(&r.quantiles.quantiles),
        #[serde(rename = "ValueAtQuantiles.Value")]
        value_at_quantiles_value: Vec<f64> = or_empty(&r.quantiles.values),
    }
}

// ============================================================================
// Insert
// ============================================================================

/// Writes one kind's records through a single `INSERT`. No-op for an empty slice.
macro_rules! write_rows {
    ($client:expr, $table:expr, $row:ty, $records:expr) => {{
        let records = $records;
        if !records.is_empty() {
            let mut insert: clickhouse::insert::Insert<$row> = $client.insert($table).await?;
            for record in records {
                let row = <$row>::from(record);
                insert.write(&row).await?;
            }
            insert.end().await?;
            tracing::debug!(table = %$table, rows = records.len(), "Inserted metric rows");
        }
    }};
}

/// Insert every non-empty kind of a batch into its table.
///
/// Returns the number of rows written.
pub async fn insert_batch(
    client: &Client,
    tables: &MetricTables,
    batch: &MetricsBatch,
) -> Result<usize, ClickhouseError> {
    if batch.is_empty() {
        return Ok(0);
    }

    write_rows!(client, &tables.gauge, GaugeRow, &batch.gauge);
    write_rows!(client, &tables.sum, SumRow, &batch.sum);
    write_rows!(client, &tables.histogram, HistogramRow, &batch.histogram);
    write_rows!(
        client,
        &tables.exp_histogram,
        ExpHistogramRow,
        &batch.exp_histogram
    );
    write_rows!(client, &tables.summary, SummaryRow, &batch.summary);

    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::domain::metrics::{BucketSet, MetricBase, MetricsMetaData};
    use crate::encode::QuantileColumns;

    fn common() -> PointCommon {
        let meta = Arc::new(MetricsMetaData {
            service_name: "api".to_string(),
            resource_attributes: HashMap::from([
                ("service.name".to_string(), "api".to_string()),
                ("host".to_string(), "h1".to_string()),
            ]),
            scope_name: "meter".to_string(),
            ..Default::default()
        });
        PointCommon {
            metadata: meta,
            metric: MetricBase {
                name: "requests".to_string(),
                description: "Request count".to_string(),
                unit: "1".to_string(),
            },
            attributes: HashMap::from([("route".to_string(), "/".to_string())]),
            start_time: Utc.timestamp_opt(1_704_067_100, 0).unwrap(),
            time: Utc.timestamp_opt(1_704_067_200, 500).unwrap(),
            flags: 1,
        }
    }

    #[test]
    fn test_tables_from_prefix() {
        let tables = MetricTables::from_prefix("otel_metrics");
        assert_eq!(tables.gauge, "otel_metrics_gauge");
        assert_eq!(tables.sum, "otel_metrics_sum");
        assert_eq!(tables.histogram, "otel_metrics_histogram");
        assert_eq!(tables.exp_histogram, "otel_metrics_exponential_histogram");
        assert_eq!(tables.summary, "otel_metrics_summary");
    }

    #[test]
    fn test_gauge_row_common_columns() {
        let record = NumberRecord {
            common: common(),
            value: 7.5,
            exemplars: ExemplarColumns::default(),
        };

        let row = GaugeRow::from(&record);
        assert_eq!(row.service_name, "api");
        assert_eq!(row.metric_name, "requests");
        assert_eq!(row.metric_description, "Request count");
        assert_eq!(row.scope_name, "meter");
        assert_eq!(
            row.resource_attributes,
            vec![
                ("host".to_string(), "h1".to_string()),
                ("service.name".to_string(), "api".to_string()),
            ]
        );
        assert_eq!(row.attributes, vec![("route".to_string(), "/".to_string())]);
        assert_eq!(row.time_unix.unix_timestamp_nanos(), 1_704_067_200_000_000_500);
        assert_eq!(row.flags, 1);
        assert_eq!(row.value, 7.5);
    }

    #[test]
    fn test_unset_exemplars_become_empty_arrays() {
        let record = NumberRecord {
            common: common(),
            value: 0.0,
            exemplars: ExemplarColumns::default(),
        };

        let row = GaugeRow::from(&record);
        assert!(row.exemplars_filtered_attributes.is_empty());
        assert!(row.exemplars_time_unix.is_empty());
        assert!(row.exemplars_value.is_empty());
        assert!(row.exemplars_span_id.is_empty());
        assert!(row.exemplars_trace_id.is_empty());
    }

    #[test]
    fn test_sum_row_exemplar_arrays() {
        let exemplars = ExemplarColumns {
            filtered_attributes: Some(vec![HashMap::from([(
                "k".to_string(),
                "v".to_string(),
            )])]),
            times: Some(vec![Utc.timestamp_opt(1, 5).unwrap()]),
            values: Some(vec![2.0]),
            trace_ids: Some(vec!["00".repeat(16)]),
            span_ids: Some(vec!["00".repeat(8)]),
        };
        let record = SumRecord {
            point: NumberRecord {
                common: common(),
                value: 3.0,
                exemplars,
            },
            aggregation_temporality: 2,
            is_monotonic: true,
        };

        let row = SumRow::from(&record);
        assert_eq!(
            row.exemplars_filtered_attributes,
            vec![vec![("k".to_string(), "v".to_string())]]
        );
        assert_eq!(row.exemplars_time_unix, vec![1_000_000_005]);
        assert_eq!(row.exemplars_value, vec![2.0]);
        assert_eq!(row.exemplars_trace_id, vec!["00".repeat(16)]);
        assert_eq!(row.exemplars_span_id, vec!["00".repeat(8)]);
        assert_eq!(row.aggregation_temporality, 2);
        assert!(row.is_monotonic);
    }

    #[test]
    fn test_exp_histogram_row_buckets() {
        let record = ExpHistogramRecord {
            common: common(),
            count: 10,
            sum: 4.0,
            scale: 1,
            zero_count: 2,
            positive: BucketSet {
                offset: -1,
                bucket_counts: vec![3, 5],
            },
            negative: BucketSet::default(),
            exemplars: ExemplarColumns::default(),
            min: 0.5,
            max: 3.0,
            aggregation_temporality: 1,
        };

        let row = ExpHistogramRow::from(&record);
        assert_eq!(row.positive_offset, -1);
        assert_eq!(row.positive_bucket_counts, vec![3, 5]);
        assert_eq!(row.negative_offset, 0);
        assert!(row.negative_bucket_counts.is_empty());
        assert_eq!(row.zero_count, 2);
    }

    #[test]
    fn test_histogram_row() {
        let record = HistogramRecord {
            common: common(),
            count: 4,
            sum: 10.0,
            bucket_counts: vec![1, 3],
            explicit_bounds: vec![5.0],
            exemplars: ExemplarColumns::default(),
            min: 1.0,
            max: 6.0,
            aggregation_temporality: 2,
        };

        let row = HistogramRow::from(&record);
        assert_eq!(row.count, 4);
        assert_eq!(row.bucket_counts, vec![1, 3]);
        assert_eq!(row.explicit_bounds, vec![5.0]);
        assert_eq!(row.min, 1.0);
        assert_eq!(row.max, 6.0);
    }

    #[test]
    fn test_summary_row_quantiles() {
        let record = SummaryRecord {
            common: common(),
            count: 3,
            sum: 6.0,
            quantiles: QuantileColumns {
                quantiles: Some(vec![0.5, 0.9]),
                values: Some(vec![2.0, 3.0]),
            },
        };

        let row = SummaryRow::from(&record);
        assert_eq!(row.value_at_quantiles_quantile, vec![0.5, 0.9]);
        assert_eq!(row.value_at_quantiles_value, vec![2.0, 3.0]);

        let empty = SummaryRow::from(&SummaryRecord {
            quantiles: QuantileColumns::default(),
            ..record
        });
        assert!(empty.value_at_quantiles_quantile.is_empty());
    }

    #[tokio::test]
    async fn test_insert_empty_batch_is_noop() {
        let client = Client::default().with_url("http://127.0.0.1:1");
        let tables = MetricTables::from_prefix("otel_metrics");
        let written = insert_batch(&client, &tables, &MetricsBatch::default())
            .await
            .unwrap();
        assert_eq!(written, 0);
    }
}
