//! Parameterized multi-row INSERT statements
//!
//! Renders `INSERT INTO <table> (<cols>) VALUES (?,..),(?,..)` text for a given row
//! count, one placeholder shape per table.

use std::fmt;

use crate::data::clickhouse::repositories::metric::MetricTables;
use crate::domain::metrics::MetricsBatch;
use crate::encode::{EXEMPLAR_ROW_WIDTH, ExemplarColumns, RowPlaceholder, batch_placeholders};

pub const EXEMPLAR_COLUMNS: [&str; EXEMPLAR_ROW_WIDTH] = [
    "Exemplars.FilteredAttributes",
    "Exemplars.TimeUnix",
    "Exemplars.Value",
    "Exemplars.SpanId",
    "Exemplars.TraceId",
];

pub const GAUGE_COLUMNS: [&str; 21] = [
    "ResourceAttributes",
    "ResourceSchemaUrl",
    "ScopeName",
    "ScopeVersion",
    "ScopeAttributes",
    "ScopeDroppedAttrCount",
    "ScopeSchemaUrl",
    "ServiceName",
    "MetricName",
    "MetricDescription",
    "MetricUnit",
    "Attributes",
    "StartTimeUnix",
    "TimeUnix",
    "Flags",
    "Value",
    "Exemplars.FilteredAttributes",
    "Exemplars.TimeUnix",
    "Exemplars.Value",
    "Exemplars.SpanId",
    "Exemplars.TraceId",
];

pub const SUM_COLUMNS: [&str; 23] = [
    "ResourceAttributes",
    "ResourceSchemaUrl",
    "ScopeName",
    "ScopeVersion",
    "ScopeAttributes",
    "ScopeDroppedAttrCount",
    "ScopeSchemaUrl",
    "ServiceName",
    "MetricName",
    "MetricDescription",
    "MetricUnit",
    "Attributes",
    "StartTimeUnix",
    "TimeUnix",
    "Flags",
    "Value",
    "Exemplars.FilteredAttributes",
    "Exemplars.TimeUnix",
    "Exemplars.Value",
    "Exemplars.SpanId",
    "Exemplars.TraceId",
    "AggregationTemporality",
    "IsMonotonic",
];

pub const HISTOGRAM_COLUMNS: [&str; 27] = [
    "ResourceAttributes",
    "ResourceSchemaUrl",
    "ScopeName",
    "ScopeVersion",
    "ScopeAttributes",
    "ScopeDroppedAttrCount",
    "ScopeSchemaUrl",
    "ServiceName",
    "MetricName",
    "MetricDescription",
    "MetricUnit",
    "Attributes",
    "StartTimeUnix",
    "TimeUnix",
    "Flags",
    "Count",
    "Sum",
    "BucketCounts",
    "ExplicitBounds",
    "Exemplars.FilteredAttributes",
    "Exemplars.TimeUnix",
    "Exemplars.Value",
    "Exemplars.SpanId",
    "Exemplars.TraceId",
    "Min",
    "Max",
    "AggregationTemporality",
];

pub const EXP_HISTOGRAM_COLUMNS: [&str; 31] = [
    "ResourceAttributes",
    "ResourceSchemaUrl",
    "ScopeName",
    "ScopeVersion",
    "ScopeAttributes",
    "ScopeDroppedAttrCount",
    "ScopeSchemaUrl",
    "ServiceName",
    "MetricName",
    "MetricDescription",
    "MetricUnit",
    "Attributes",
    "StartTimeUnix",
    "TimeUnix",
    "Flags",
    "Count",
    "Sum",
    "Scale",
    "ZeroCount",
    "PositiveOffset",
    "PositiveBucketCounts",
    "NegativeOffset",
    "NegativeBucketCounts",
    "Exemplars.FilteredAttributes",
    "Exemplars.TimeUnix",
    "Exemplars.Value",
    "Exemplars.SpanId",
    "Exemplars.TraceId",
    "Min",
    "Max",
    "AggregationTemporality",
];

pub const SUMMARY_COLUMNS: [&str; 19] = [
    "ResourceAttributes",
    "ResourceSchemaUrl",
    "ScopeName",
    "ScopeVersion",
    "ScopeAttributes",
    "ScopeDroppedAttrCount",
    "ScopeSchemaUrl",
    "ServiceName",
    "MetricName",
    "MetricDescription",
    "MetricUnit",
    "Attributes",
    "StartTimeUnix",
    "TimeUnix",
    "Flags",
    "Count",
    "Sum",
    "ValueAtQuantiles.Quantile",
    "ValueAtQuantiles.Value",
];

/// A rendered multi-row INSERT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: &'static [&'static str],
    pub row_count: usize,
    placeholders: String,
}

impl InsertStatement {
    fn with_shape<const WIDTH: usize>(
        table: &str,
        columns: &'static [&'static str; WIDTH],
        row_count: usize,
    ) -> Self {
        Self {
            table: table.to_string(),
            columns,
            row_count,
            placeholders: RowPlaceholder::<WIDTH>::repeat(row_count),
        }
    }

    pub fn gauge(table: &str, row_count: usize) -> Self {
        Self::with_shape(table, &GAUGE_COLUMNS, row_count)
    }

    pub fn sum(table: &str, row_count: usize) -> Self {
        Self::with_shape(table, &SUM_COLUMNS, row_count)
    }

    pub fn histogram(table: &str, row_count: usize) -> Self {
        Self::with_shape(table, &HISTOGRAM_COLUMNS, row_count)
    }

    pub fn exp_histogram(table: &str, row_count: usize) -> Self {
        Self::with_shape(table, &EXP_HISTOGRAM_COLUMNS, row_count)
    }

    pub fn summary(table: &str, row_count: usize) -> Self {
        Self::with_shape(table, &SUMMARY_COLUMNS, row_count)
    }

    /// Exemplar-shaped rows (the five `Exemplars.*` columns)
    pub fn exemplars(table: &str, row_count: usize) -> Self {
        Self {
            table: table.to_string(),
            columns: &EXEMPLAR_COLUMNS,
            row_count,
            placeholders: batch_placeholders(row_count),
        }
    }

    /// One statement per non-empty kind of the batch
    pub fn for_batch(tables: &MetricTables, batch: &MetricsBatch) -> Vec<Self> {
        [
            Self::gauge(&tables.gauge, batch.gauge.len()),
            Self::sum(&tables.sum, batch.sum.len()),
            Self::histogram(&tables.histogram, batch.histogram.len()),
            Self::exp_histogram(&tables.exp_histogram, batch.exp_histogram.len()),
            Self::summary(&tables.summary, batch.summary.len()),
        ]
        .into_iter()
        .filter(|s| s.row_count > 0)
        .collect()
    }

    /// One exemplar-shaped statement per table whose rows carry exemplars,
    /// sized to the total exemplar count of that table
    pub fn exemplars_for_batch(tables: &MetricTables, batch: &MetricsBatch) -> Vec<Self> {
        fn total<'a>(columns: impl Iterator<Item = &'a ExemplarColumns>) -> usize {
            columns.map(|c| c.row_count().unwrap_or(0)).sum()
        }

        [
            (&tables.gauge, total(batch.gauge.iter().map(|r| &r.exemplars))),
            (&tables.sum, total(batch.sum.iter().map(|r| &r.point.exemplars))),
            (
                &tables.histogram,
                total(batch.histogram.iter().map(|r| &r.exemplars)),
            ),
            (
                &tables.exp_histogram,
                total(batch.exp_histogram.iter().map(|r| &r.exemplars)),
            ),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(table, count)| Self::exemplars(table, count))
        .collect()
    }

    /// Bound parameters across all rows
    pub fn param_count(&self) -> usize {
        self.columns.len() * self.row_count
    }

    /// Placeholder groups without the generator's trailing comma
    pub fn values_clause(&self) -> &str {
        self.placeholders
            .strip_suffix(',')
            .unwrap_or(&self.placeholders)
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            self.values_clause()
        )
    }
}
