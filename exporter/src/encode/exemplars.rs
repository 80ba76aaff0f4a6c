//! Exemplar columnization
//!
//! Projects a data point's exemplars into the five parallel arrays stored in the
//! `Exemplars.*` nested columns.

use chrono::{DateTime, Utc};
use opentelemetry_proto::tonic::metrics::v1::Exemplar;

use super::attributes::{FlatAttributes, flatten_attributes};
use super::ids::{encode_span_id, encode_trace_id, span_id_from_bytes, trace_id_from_bytes};
use super::value::{exemplar_value_parts, resolve_value};
use crate::utils::time::nanos_to_datetime;

/// Exemplar columns for one data point, index-aligned.
///
/// Every field is `None` when the source had no exemplars, never `Some(vec![])`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExemplarColumns {
    pub filtered_attributes: Option<Vec<FlatAttributes>>,
    pub times: Option<Vec<DateTime<Utc>>>,
    pub values: Option<Vec<f64>>,
    pub trace_ids: Option<Vec<String>>,
    pub span_ids: Option<Vec<String>>,
}

impl ExemplarColumns {
    /// Number of rows, or `None` if the columns disagree
    pub fn row_count(&self) -> Option<usize> {
        let lens = [
            self.filtered_attributes.as_ref().map_or(0, Vec::len),
            self.times.as_ref().map_or(0, Vec::len),
            self.values.as_ref().map_or(0, Vec::len),
            self.trace_ids.as_ref().map_or(0, Vec::len),
            self.span_ids.as_ref().map_or(0, Vec::len),
        ];
        lens.iter().all(|&l| l == lens[0]).then_some(lens[0])
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == Some(0)
    }

    /// True if every column has the same length
    pub fn is_aligned(&self) -> bool {
        self.row_count().is_some()
    }
}

/// Appends exemplars to five pre-sized columns in one pass
#[derive(Debug)]
pub struct ExemplarColumnsBuilder {
    filtered_attributes: Vec<FlatAttributes>,
    times: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    trace_ids: Vec<String>,
    span_ids: Vec<String>,
}

impl ExemplarColumnsBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            filtered_attributes: Vec::with_capacity(capacity),
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            trace_ids: Vec::with_capacity(capacity),
            span_ids: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, exemplar: &Exemplar) {
        let (int_value, double_value, value_type) = exemplar_value_parts(exemplar.value.as_ref());

        self.filtered_attributes
            .push(flatten_attributes(&exemplar.filtered_attributes));
        self.times.push(nanos_to_datetime(exemplar.time_unix_nano));
        self.values
            .push(resolve_value(int_value, double_value, value_type));
        self.trace_ids
            .push(encode_trace_id(&trace_id_from_bytes(&exemplar.trace_id)));
        self.span_ids
            .push(encode_span_id(&span_id_from_bytes(&exemplar.span_id)));
    }

    pub fn finish(self) -> ExemplarColumns {
        if self.values.is_empty() {
            return ExemplarColumns::default();
        }
        ExemplarColumns {
            filtered_attributes: Some(self.filtered_attributes),
            times: Some(self.times),
            values: Some(self.values),
            trace_ids: Some(self.trace_ids),
            span_ids: Some(self.span_ids),
        }
    }
}

/// Columnize a sequence of exemplars, preserving order
pub fn convert_exemplars(exemplars: &[Exemplar]) -> ExemplarColumns {
    let mut builder = ExemplarColumnsBuilder::with_capacity(exemplars.len());
    for exemplar in exemplars {
        builder.push(exemplar);
    }
    let columns = builder.finish();
    debug_assert!(columns.is_aligned());
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
    use opentelemetry_proto::tonic::metrics::v1::exemplar::Value;

    const ZERO_TRACE_ID: &str = "00000000000000000000000000000000";
    const ZERO_SPAN_ID: &str = "0000000000000000";

    fn str_attr(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.to_string())),
            }),
        }
    }

    fn flat(pairs: &[(&str, &str)]) -> FlatAttributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn padded<const N: usize>(prefix: &[u8]) -> Vec<u8> {
        let mut id = vec![0u8; N];
        id[..prefix.len()].copy_from_slice(prefix);
        id
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_exemplars_are_unset() {
        let columns = convert_exemplars(&[]);
        assert_eq!(columns, ExemplarColumns::default());
        assert_eq!(columns.filtered_attributes, None);
        assert_eq!(columns.times, None);
        assert_eq!(columns.values, None);
        assert_eq!(columns.trace_ids, None);
        assert_eq!(columns.span_ids, None);
        assert_ne!(columns.values, Some(vec![]));
        assert!(columns.is_empty());
    }

    #[test]
    fn test_only_filtered_attributes() {
        let exemplar = Exemplar {
            filtered_attributes: vec![str_attr("key1", "value1"), str_attr("key2", "value2")],
            ..Default::default()
        };

        let columns = convert_exemplars(&[exemplar]);
        assert_eq!(
            columns.filtered_attributes,
            Some(vec![flat(&[("key1", "value1"), ("key2", "value2")])])
        );
        assert_eq!(columns.times, Some(vec![epoch()]));
        assert_eq!(columns.values, Some(vec![0.0]));
        assert_eq!(columns.trace_ids, Some(vec![ZERO_TRACE_ID.to_string()]));
        assert_eq!(columns.span_ids, Some(vec![ZERO_SPAN_ID.to_string()]));
    }

    #[test]
    fn test_only_timestamp() {
        let exemplar = Exemplar {
            time_unix_nano: 1_672_218_930 * 1_000_000_000,
            ..Default::default()
        };

        let columns = convert_exemplars(&[exemplar]);
        assert_eq!(columns.filtered_attributes, Some(vec![FlatAttributes::new()]));
        assert_eq!(
            columns.times,
            Some(vec![Utc.timestamp_opt(1_672_218_930, 0).unwrap()])
        );
        assert_eq!(columns.values, Some(vec![0.0]));
    }

    #[test]
    fn test_default_timestamp_is_epoch() {
        let columns = convert_exemplars(&[Exemplar::default()]);
        let times = columns.times.unwrap();
        assert_eq!(times[0], DateTime::UNIX_EPOCH);
        assert_eq!(times[0].to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_only_double_value() {
        let exemplar = Exemplar {
            value: Some(Value::AsDouble(15.0)),
            ..Default::default()
        };

        let columns = convert_exemplars(&[exemplar]);
        assert_eq!(columns.values, Some(vec![15.0]));
        assert_eq!(columns.times, Some(vec![epoch()]));
    }

    #[test]
    fn test_only_int_value() {
        let exemplar = Exemplar {
            value: Some(Value::AsInt(20)),
            ..Default::default()
        };

        let columns = convert_exemplars(&[exemplar]);
        assert_eq!(columns.values, Some(vec![20.0]));
    }

    #[test]
    fn test_only_span_id() {
        let exemplar = Exemplar {
            span_id: padded::<8>(&[1, 2, 3, 4]),
            ..Default::default()
        };

        let columns = convert_exemplars(&[exemplar]);
        assert_eq!(columns.trace_ids, Some(vec![ZERO_TRACE_ID.to_string()]));
        assert_eq!(columns.span_ids, Some(vec!["0102030400000000".to_string()]));
    }

    #[test]
    fn test_only_trace_id() {
        let exemplar = Exemplar {
            trace_id: padded::<16>(&[1, 2, 3, 4]),
            ..Default::default()
        };

        let columns = convert_exemplars(&[exemplar]);
        assert_eq!(
            columns.trace_ids,
            Some(vec!["01020304000000000000000000000000".to_string()])
        );
        assert_eq!(columns.span_ids, Some(vec![ZERO_SPAN_ID.to_string()]));
    }

    #[test]
    fn test_two_exemplars_keep_order() {
        let first = Exemplar {
            filtered_attributes: vec![str_attr("key1", "value1"), str_attr("key2", "value2")],
            time_unix_nano: 1_672_218_930 * 1_000_000_000,
            value: Some(Value::AsInt(20)),
            span_id: padded::<8>(&[1, 2, 3, 4]),
            trace_id: padded::<16>(&[1, 2, 3, 4]),
        };
        let second = Exemplar {
            filtered_attributes: vec![str_attr("key3", "value3"), str_attr("key4", "value4")],
            time_unix_nano: 1_672_219_930 * 1_000_000_000,
            value: Some(Value::AsDouble(16.0)),
            span_id: padded::<8>(&[1, 2, 3, 5]),
            trace_id: padded::<16>(&[1, 2, 3, 5]),
        };

        let columns = convert_exemplars(&[first, second]);
        assert_eq!(columns.row_count(), Some(2));
        assert_eq!(
            columns.filtered_attributes,
            Some(vec![
                flat(&[("key1", "value1"), ("key2", "value2")]),
                flat(&[("key3", "value3"), ("key4", "value4")]),
            ])
        );
        assert_eq!(
            columns.times,
            Some(vec![
                Utc.timestamp_opt(1_672_218_930, 0).unwrap(),
                Utc.timestamp_opt(1_672_219_930, 0).unwrap(),
            ])
        );
        assert_eq!(columns.values, Some(vec![20.0, 16.0]));
        assert_eq!(
            columns.trace_ids,
            Some(vec![
                "01020304000000000000000000000000".to_string(),
                "01020305000000000000000000000000".to_string(),
            ])
        );
        assert_eq!(
            columns.span_ids,
            Some(vec![
                "0102030400000000".to_string(),
                "0102030500000000".to_string(),
            ])
        );
    }

    #[test]
    fn test_columns_stay_aligned() {
        for n in [1usize, 3, 17] {
            let exemplars: Vec<Exemplar> = (0..n)
                .map(|i| Exemplar {
                    value: Some(Value::AsInt(i as i64)),
                    ..Default::default()
                })
                .collect();

            let columns = convert_exemplars(&exemplars);
            assert!(columns.is_aligned());
            assert_eq!(columns.row_count(), Some(n));
            let expected: Vec<f64> = (0..n).map(|i| i as f64).collect();
            assert_eq!(columns.values, Some(expected));
        }
    }

    #[test]
    fn test_misaligned_columns_detected() {
        let columns = ExemplarColumns {
            values: Some(vec![1.0]),
            ..Default::default()
        };
        assert!(!columns.is_aligned());
        assert_eq!(columns.row_count(), None);
    }
}
