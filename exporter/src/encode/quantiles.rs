//! Summary quantile columnization

use opentelemetry_proto::tonic::metrics::v1::summary_data_point::ValueAtQuantile;

/// `ValueAtQuantiles.*` columns for one summary data point.
///
/// Both fields are `None` when the source had no quantile values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantileColumns {
    pub quantiles: Option<Vec<f64>>,
    pub values: Option<Vec<f64>>,
}

impl QuantileColumns {
    /// Number of rows, or `None` if the columns disagree
    pub fn row_count(&self) -> Option<usize> {
        let quantiles = self.quantiles.as_ref().map_or(0, Vec::len);
        let values = self.values.as_ref().map_or(0, Vec::len);
        (quantiles == values).then_some(quantiles)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == Some(0)
    }

    pub fn is_aligned(&self) -> bool {
        self.row_count().is_some()
    }
}

/// Columnize quantile values, preserving order
pub fn convert_quantiles(values_at_quantile: &[ValueAtQuantile]) -> QuantileColumns {
    if values_at_quantile.is_empty() {
        return QuantileColumns::default();
    }

    let mut quantiles = Vec::with_capacity(values_at_quantile.len());
    let mut values = Vec::with_capacity(values_at_quantile.len());
    for vq in values_at_quantile {
        quantiles.push(vq.quantile);
        values.push(vq.value);
    }

    QuantileColumns {
        quantiles: Some(quantiles),
        values: Some(values),
    }
}
