//! Column encoding for metric rows
//!
//! Pure conversions from OTLP metric structures to the column values written to
//! ClickHouse. Nothing in here performs I/O or returns an error.

pub mod attributes;
pub mod exemplars;
pub mod ids;
pub mod placeholder;
pub mod quantiles;
pub mod value;

pub use attributes::{FlatAttributes, flatten_attributes, map_entries};
pub use exemplars::{ExemplarColumns, ExemplarColumnsBuilder, convert_exemplars};
pub use ids::{encode_span_id, encode_trace_id};
pub use placeholder::{EXEMPLAR_ROW_WIDTH, RowPlaceholder, batch_placeholders};
pub use quantiles::{QuantileColumns, convert_quantiles};
pub use value::{
    ExemplarValueType, NumberDataPointValueType, NumericKind, ValueType, resolve_value,
};
