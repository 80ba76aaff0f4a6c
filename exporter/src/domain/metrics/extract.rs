//! Metric extraction from OTLP protobuf
//!
//! Walks resource → scope → metric and builds one record per data point, grouped by
//! metric kind so each group maps onto one ClickHouse table.

use std::sync::Arc;

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_proto::tonic::metrics::v1::{Metric, metric::Data};

use super::histogram::{ExpHistogramRecord, HistogramRecord};
use super::metadata::{MetricBase, MetricsMetaData};
use super::number::{NumberRecord, SumRecord};
use super::summary::SummaryRecord;

/// Rows extracted from one export request, grouped by metric kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsBatch {
    pub gauge: Vec<NumberRecord>,
    pub sum: Vec<SumRecord>,
    pub histogram: Vec<HistogramRecord>,
    pub exp_histogram: Vec<ExpHistogramRecord>,
    pub summary: Vec<SummaryRecord>,
    /// Gauge/sum data points whose value was unset (written as 0.0)
    pub unset_values: usize,
    /// Metrics with no data, not written
    pub skipped_metrics: usize,
}

impl MetricsBatch {
    /// Total number of rows across all kinds
    pub fn len(&self) -> usize {
        self.gauge.len()
            + self.sum.len()
            + self.histogram.len()
            + self.exp_histogram.len()
            + self.summary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if some input was dropped or written as 0
    pub fn has_incomplete_input(&self) -> bool {
        self.skipped_metrics > 0 || self.unset_values > 0
    }

    pub fn log_summary(&self) {
        tracing::debug!(
            gauge = self.gauge.len(),
            sum = self.sum.len(),
            histogram = self.histogram.len(),
            exp_histogram = self.exp_histogram.len(),
            summary = self.summary.len(),
            skipped_metrics = self.skipped_metrics,
            "Extracted metrics batch"
        );
        if self.skipped_metrics > 0 {
            tracing::warn!(
                metrics = self.skipped_metrics,
                "Metrics without decodable data were not written"
            );
        }
        if self.unset_values > 0 {
            tracing::warn!(
                data_points = self.unset_values,
                "Number data points without a value were written as 0"
            );
        }
    }

    fn add_metric(&mut self, meta: &Arc<MetricsMetaData>, metric: &Metric) {
        let Some(ref data) = metric.data else {
            tracing::debug!(metric = %metric.name, "Skipping metric without data");
            self.skipped_metrics += 1;
            return;
        };

        let base = MetricBase::from(metric);

        match data {
            Data::Gauge(g) => {
                for dp in &g.data_points {
                    if dp.value.is_none() {
                        self.unset_values += 1;
                    }
                    self.gauge.push(NumberRecord::new(meta, &base, dp));
                }
            }
            Data::Sum(s) => {
                for dp in &s.data_points {
                    if dp.value.is_none() {
                        self.unset_values += 1;
                    }
                    self.sum.push(SumRecord {
                        point: NumberRecord::new(meta, &base, dp),
                        aggregation_temporality: s.aggregation_temporality,
                        is_monotonic: s.is_monotonic,
                    });
                }
            }
            Data::Histogram(h) => {
                for dp in &h.data_points {
                    self.histogram.push(HistogramRecord::new(
                        meta,
                        &base,
                        dp,
                        h.aggregation_temporality,
                    ));
                }
            }
            Data::ExponentialHistogram(eh) => {
                for dp in &eh.data_points {
                    self.exp_histogram.push(ExpHistogramRecord::new(
                        meta,
                        &base,
                        dp,
                        eh.aggregation_temporality,
                    ));
                }
            }
            Data::Summary(s) => {
                for dp in &s.data_points {
                    self.summary.push(SummaryRecord::new(meta, &base, dp));
                }
            }
        }
    }
}

/// Extract all metric data points from an OTLP request
pub fn extract_metrics_batch(request: &ExportMetricsServiceRequest) -> MetricsBatch {
    let mut batch = MetricsBatch::default();

    for resource_metrics in &request.resource_metrics {
        for scope_metrics in &resource_metrics.scope_metrics {
            let meta = Arc::new(MetricsMetaData::new(
                resource_metrics.resource.as_ref(),
                &resource_metrics.schema_url,
                scope_metrics.scope.as_ref(),
                &scope_metrics.schema_url,
            ));

            for metric in &scope_metrics.metrics {
                batch.add_metric(&meta, metric);
            }
        }
    }

    batch
}
