//! Numeric value resolution
//!
//! OTLP data points and exemplars both carry an int-or-double oneof, described by two
//! separate value-type enums. Both are normalized through [`NumericKind`] so the
//! resolution rule lives in one place.

use opentelemetry_proto::tonic::metrics::v1::{exemplar, number_data_point};

/// Normalized classification shared by every value-type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Int,
    Double,
    Unknown,
}

/// A value-type discriminant that can be normalized to a [`NumericKind`]
pub trait ValueType: Copy {
    fn numeric_kind(self) -> NumericKind;
}

/// Value type of a gauge/sum data point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberDataPointValueType {
    #[default]
    Empty,
    Int,
    Double,
}

impl ValueType for NumberDataPointValueType {
    fn numeric_kind(self) -> NumericKind {
        match self {
            Self::Int => NumericKind::Int,
            Self::Double => NumericKind::Double,
            Self::Empty => NumericKind::Unknown,
        }
    }
}

/// Value type of an exemplar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExemplarValueType {
    #[default]
    Empty,
    Int,
    Double,
}

impl ValueType for ExemplarValueType {
    fn numeric_kind(self) -> NumericKind {
        match self {
            Self::Int => NumericKind::Int,
            Self::Double => NumericKind::Double,
            Self::Empty => NumericKind::Unknown,
        }
    }
}

/// Resolve an int/double pair to a single `f64` according to its value type.
///
/// Unknown value types resolve to `0.0`; this never fails.
pub fn resolve_value<T: ValueType>(int_value: i64, double_value: f64, value_type: T) -> f64 {
    match value_type.numeric_kind() {
        NumericKind::Int => int_value as f64,
        NumericKind::Double => double_value,
        NumericKind::Unknown => 0.0,
    }
}

/// Split a data point value oneof into `(int, double, type)`
pub fn number_value_parts(
    value: Option<&number_data_point::Value>,
) -> (i64, f64, NumberDataPointValueType) {
    match value {
        Some(number_data_point::Value::AsInt(i)) => (*i, 0.0, NumberDataPointValueType::Int),
        Some(number_data_point::Value::AsDouble(d)) => (0, *d, NumberDataPointValueType::Double),
        None => (0, 0.0, NumberDataPointValueType::Empty),
    }
}

/// Split an exemplar value oneof into `(int, double, type)`
pub fn exemplar_value_parts(value: Option<&exemplar::Value>) -> (i64, f64, ExemplarValueType) {
    match value {
        Some(exemplar::Value::AsInt(i)) => (*i, 0.0, ExemplarValueType::Int),
        Some(exemplar::Value::AsDouble(d)) => (0, *d, ExemplarValueType::Double),
        None => (0, 0.0, ExemplarValueType::Empty),
    }
}
