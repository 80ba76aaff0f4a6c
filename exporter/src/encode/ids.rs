//! Trace and span identifier encoding

/// Width of a trace id in bytes
pub const TRACE_ID_LEN: usize = 16;

/// Width of a span id in bytes
pub const SPAN_ID_LEN: usize = 8;

pub type TraceId = [u8; TRACE_ID_LEN];
pub type SpanId = [u8; SPAN_ID_LEN];

/// Lowercase hex of a trace id (always 32 characters)
pub fn encode_trace_id(id: &TraceId) -> String {
    hex::encode(id)
}

/// Lowercase hex of a span id (always 16 characters)
pub fn encode_span_id(id: &SpanId) -> String {
    hex::encode(id)
}

/// Trace id from OTLP bytes. Anything but exactly 16 bytes is unset (all zero).
pub fn trace_id_from_bytes(bytes: &[u8]) -> TraceId {
    TraceId::try_from(bytes).unwrap_or_default()
}

/// Span id from OTLP bytes. Anything but exactly 8 bytes is unset (all zero).
pub fn span_id_from_bytes(bytes: &[u8]) -> SpanId {
    SpanId::try_from(bytes).unwrap_or_default()
}
