//! OTLP payload decoding and resource helpers
//!
//! Supports both protobuf and JSON encodings of `ExportMetricsServiceRequest`
//! per the OpenTelemetry Protocol specification.

use std::fmt;
use std::path::Path;

use opentelemetry_proto::tonic::common::v1::{KeyValue, any_value};
use prost::Message;
use serde::Deserialize;

/// Shared attribute keys
pub mod keys {
    pub const SERVICE_NAME: &str = "service.name";
}

/// Encoding of an OTLP payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtlpFormat {
    Protobuf,
    Json,
}

impl OtlpFormat {
    /// Infer the format from a file extension. Defaults to protobuf.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OtlpFormat::Json,
            _ => OtlpFormat::Protobuf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OtlpFormat::Protobuf => "protobuf",
            OtlpFormat::Json => "json",
        }
    }
}

impl fmt::Display for OtlpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when decoding fails
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Decode an OTLP request from bytes
pub fn decode_request<T>(body: &[u8], format: OtlpFormat) -> Result<T, DecodeError>
where
    T: Message + Default + for<'de> Deserialize<'de>,
{
    match format {
        OtlpFormat::Protobuf => Ok(T::decode(body)?),
        OtlpFormat::Json => Ok(serde_json::from_slice(body)?),
    }
}

/// Read and decode an OTLP request from a file
pub async fn read_request<T>(path: &Path, format: OtlpFormat) -> Result<T, DecodeError>
where
    T: Message + Default + for<'de> Deserialize<'de>,
{
    let body = tokio::fs::read(path).await.map_err(|source| DecodeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = body.len(), %format, "Read OTLP payload");
    decode_request(&body, format)
}

/// Value of the `service.name` resource attribute, empty when absent or not a string
pub fn service_name(resource_attrs: &[KeyValue]) -> String {
    resource_attrs
        .iter()
        .find(|kv| kv.key == keys::SERVICE_NAME)
        .and_then(|kv| kv.value.as_ref())
        .and_then(|v| match &v.value {
            Some(any_value::Value::StringValue(s)) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default()
}
