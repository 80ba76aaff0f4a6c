//! Resource, scope and metric context shared by every data point row

use std::sync::Arc;

use chrono::{DateTime, Utc};
use opentelemetry_proto::tonic::common::v1::{InstrumentationScope, KeyValue};
use opentelemetry_proto::tonic::metrics::v1::Metric;
use opentelemetry_proto::tonic::resource::v1::Resource;

use crate::encode::{FlatAttributes, flatten_attributes};
use crate::utils::otlp::service_name;
use crate::utils::time::nanos_to_datetime;

/// Resource and scope context, built once per scope_metrics and shared by its rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsMetaData {
    pub resource_attributes: FlatAttributes,
    pub resource_schema_url: String,
    pub service_name: String,
    pub scope_name: String,
    pub scope_version: String,
    pub scope_attributes: FlatAttributes,
    pub scope_dropped_attr_count: u32,
    pub scope_schema_url: String,
}

impl MetricsMetaData {
    pub fn new(
        resource: Option<&Resource>,
        resource_schema_url: &str,
        scope: Option<&InstrumentationScope>,
        scope_schema_url: &str,
    ) -> Self {
        let resource_attrs = resource.map(|r| r.attributes.as_slice()).unwrap_or(&[]);

        Self {
            resource_attributes: flatten_attributes(resource_attrs),
            resource_schema_url: resource_schema_url.to_string(),
            service_name: service_name(resource_attrs),
            scope_name: scope.map(|s| s.name.clone()).unwrap_or_default(),
            scope_version: scope.map(|s| s.version.clone()).unwrap_or_default(),
            scope_attributes: scope
                .map(|s| flatten_attributes(&s.attributes))
                .unwrap_or_default(),
            scope_dropped_attr_count: scope.map_or(0, |s| s.dropped_attributes_count),
            scope_schema_url: scope_schema_url.to_string(),
        }
    }
}

/// Metric identity (name, description, unit)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricBase {
    pub name: String,
    pub description: String,
    pub unit: String,
}

impl From<&Metric> for MetricBase {
    fn from(metric: &Metric) -> Self {
        Self {
            name: metric.name.clone(),
            description: metric.description.clone(),
            unit: metric.unit.clone(),
        }
    }
}

/// Columns common to every metric table
#[derive(Debug, Clone, PartialEq)]
pub struct PointCommon {
    pub metadata: Arc<MetricsMetaData>,
    pub metric: MetricBase,
    pub attributes: FlatAttributes,
    pub start_time: DateTime<Utc>,
    pub time: DateTime<Utc>,
    pub flags: u32,
}

impl PointCommon {
    pub fn new(
        metadata: &Arc<MetricsMetaData>,
        metric: &MetricBase,
        attributes: &[KeyValue],
        start_time_unix_nano: u64,
        time_unix_nano: u64,
        flags: u32,
    ) -> Self {
        Self {
            metadata: Arc::clone(metadata),
            metric: metric.clone(),
            attributes: flatten_attributes(attributes),
            start_time: nanos_to_datetime(start_time_unix_nano),
            time: nanos_to_datetime(time_unix_nano),
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{AnyValue, any_value};

    fn make_key_value(key: &str, value: any_value::Value) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue { value: Some(value) }),
        }
    }

    #[test]
    fn test_metadata_from_resource_and_scope() {
        let resource = Resource {
            attributes: vec![
                make_key_value("service.name", any_value::Value::StringValue("api".into())),
                make_key_value("host.cpu", any_value::Value::IntValue(8)),
            ],
            ..Default::default()
        };
        let scope = InstrumentationScope {
            name: "meter".to_string(),
            version: "1.2.0".to_string(),
            attributes: vec![make_key_value(
                "lib",
                any_value::Value::StringValue("otel".into()),
            )],
            dropped_attributes_count: 3,
            ..Default::default()
        };

        let meta = MetricsMetaData::new(
            Some(&resource),
            "https://opentelemetry.io/schemas/1.21.0",
            Some(&scope),
            "https://scope.example/schema",
        );

        assert_eq!(meta.service_name, "api");
        assert_eq!(meta.resource_attributes.get("service.name").unwrap(), "api");
        assert_eq!(meta.resource_attributes.get("host.cpu").unwrap(), "");
        assert_eq!(
            meta.resource_schema_url,
            "https://opentelemetry.io/schemas/1.21.0"
        );
        assert_eq!(meta.scope_name, "meter");
        assert_eq!(meta.scope_version, "1.2.0");
        assert_eq!(meta.scope_attributes.get("lib").unwrap(), "otel");
        assert_eq!(meta.scope_dropped_attr_count, 3);
        assert_eq!(meta.scope_schema_url, "https://scope.example/schema");
    }

    #[test]
    fn test_metadata_without_resource_or_scope() {
        let meta = MetricsMetaData::new(None, "", None, "");
        assert_eq!(meta, MetricsMetaData::default());
    }

    #[test]
    fn test_point_common_unset_times_are_epoch() {
        let meta = Arc::new(MetricsMetaData::default());
        let base = MetricBase {
            name: "m".to_string(),
            ..Default::default()
        };

        let common = PointCommon::new(&meta, &base, &[], 0, 0, 1);
        assert_eq!(common.start_time, DateTime::UNIX_EPOCH);
        assert_eq!(common.time, DateTime::UNIX_EPOCH);
        assert_eq!(common.flags, 1);
        assert!(common.attributes.is_empty());
        assert!(Arc::ptr_eq(&common.metadata, &meta));
    }
}
