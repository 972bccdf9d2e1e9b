//! Legacy tracing pipelines.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::duration;
use super::http::{BasicAuth, TlsConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracesConfig {
    pub configs: Vec<TracesInstanceConfig>,
}

/// One tracing pipeline.
///
/// Receivers and processors hold collector-style settings whose shape
/// depends on the component kind, so they stay untyped until conversion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracesInstanceConfig {
    pub name: String,
    pub remote_write: Vec<TracesRemoteWriteConfig>,
    pub receivers: BTreeMap<String, serde_json::Value>,
    pub batch: Option<serde_json::Value>,
    pub attributes: Option<serde_json::Value>,
    pub spanmetrics: Option<SpanMetricsConfig>,

    pub scrape_configs: Vec<serde_json::Value>,
    pub automatic_logging: Option<serde_json::Value>,
    pub tail_sampling: Option<serde_json::Value>,
    pub load_balancing: Option<serde_json::Value>,
    pub service_graphs: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracesRemoteWriteConfig {
    pub endpoint: String,
    pub compression: String,
    pub protocol: String,
    pub insecure: bool,
    pub insecure_skip_verify: bool,
    pub tls_config: Option<TlsConfig>,
    pub basic_auth: Option<BasicAuth>,
    pub headers: BTreeMap<String, String>,
    pub sending_queue: Option<serde_json::Value>,
    pub retry_on_failure: Option<serde_json::Value>,
}

impl Default for TracesRemoteWriteConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            compression: "gzip".to_string(),
            protocol: "grpc".to_string(),
            insecure: false,
            insecure_skip_verify: false,
            tls_config: None,
            basic_auth: None,
            headers: BTreeMap::new(),
            sending_queue: None,
            retry_on_failure: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpanMetricsDimension {
    pub name: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpanMetricsConfig {
    #[serde(with = "duration::list")]
    pub latency_histogram_buckets: Vec<Duration>,
    pub dimensions: Vec<SpanMetricsDimension>,
    pub namespace: String,
    /// Labels attached to every exported metric.
    pub const_labels: BTreeMap<String, String>,
    pub metrics_instance: String,
    pub handler_endpoint: String,
}

impl SpanMetricsConfig {
    /// Metric namespace, always ending in `traces_spanmetrics`.
    pub fn metrics_namespace(&self) -> String {
        if self.namespace.is_empty() {
            "traces_spanmetrics".to_string()
        } else {
            format!("{}_traces_spanmetrics", self.namespace)
        }
    }
}

/// Network settings of one receiver protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolConfig {
    pub endpoint: Option<String>,
}

/// A protocol key written without a body (`grpc: null`) still enables it.
fn enabled_protocol<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ProtocolConfig>, D::Error> {
    Ok(Some(Option::<ProtocolConfig>::deserialize(deserializer)?.unwrap_or_default()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OtlpProtocols {
    #[serde(deserialize_with = "enabled_protocol")]
    pub grpc: Option<ProtocolConfig>,
    #[serde(deserialize_with = "enabled_protocol")]
    pub http: Option<ProtocolConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OtlpReceiverConfig {
    pub protocols: OtlpProtocols,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JaegerProtocols {
    #[serde(deserialize_with = "enabled_protocol")]
    pub grpc: Option<ProtocolConfig>,
    #[serde(deserialize_with = "enabled_protocol")]
    pub thrift_http: Option<ProtocolConfig>,
    #[serde(deserialize_with = "enabled_protocol")]
    pub thrift_binary: Option<ProtocolConfig>,
    #[serde(deserialize_with = "enabled_protocol")]
    pub thrift_compact: Option<ProtocolConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JaegerReceiverConfig {
    pub protocols: JaegerProtocols,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZipkinReceiverConfig {
    pub endpoint: Option<String>,
    pub parse_string_tags: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributeAction {
    pub key: String,
    pub value: Option<serde_json::Value>,
    pub from_attribute: Option<String>,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributesProcessorConfig {
    pub actions: Vec<AttributeAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchProcessorConfig {
    #[serde(with = "duration::option")]
    pub timeout: Option<Duration>,
    pub send_batch_size: Option<u32>,
    pub send_batch_max_size: Option<u32>,
}

/// Decode a processor fragment. A processor listed without settings uses
/// its defaults.
pub fn decode_processor<T: DeserializeOwned + Default>(
    fragment: &serde_json::Value,
) -> flowconv_common::Result<T> {
    if fragment.is_null() {
        return Ok(T::default());
    }
    flowconv_common::decode_untyped(fragment)
}

/// A supported receiver, decoded into its typed config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverConfig {
    Otlp(OtlpReceiverConfig),
    Jaeger(JaegerReceiverConfig),
    Zipkin(ZipkinReceiverConfig),
}

impl ReceiverConfig {
    /// Decode a receiver fragment. `None` if the kind is not supported.
    pub fn decode(
        kind: &str,
        fragment: &serde_json::Value,
    ) -> Option<flowconv_common::Result<Self>> {
        use flowconv_common::decode_untyped;

        // A receiver listed without settings uses its defaults.
        let empty = serde_json::Value::Object(serde_json::Map::new());
        let fragment = if fragment.is_null() { &empty } else { fragment };

        let decoded = match kind {
            "otlp" => decode_untyped(fragment).map(Self::Otlp),
            "jaeger" => decode_untyped(fragment).map(Self::Jaeger),
            "zipkin" => decode_untyped(fragment).map(Self::Zipkin),
            _ => return None,
        };
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_instance() {
        let cfg: TracesConfig = serde_json::from_value(json!({
            "configs": [{
                "name": "default",
                "receivers": { "otlp": { "protocols": { "grpc": null } } },
                "remote_write": [{ "endpoint": "tempo:4317", "insecure": true }],
                "spanmetrics": {
                    "namespace": "app",
                    "const_labels": { "source": "agent" },
                    "latency_histogram_buckets": ["2ms", "1s"],
                },
            }],
        }))
        .unwrap();

        let instance = &cfg.configs[0];
        assert_eq!(instance.name, "default");
        assert!(instance.receivers.contains_key("otlp"));
        assert_eq!(instance.remote_write[0].compression, "gzip");
        assert_eq!(instance.remote_write[0].protocol, "grpc");

        let spanmetrics = instance.spanmetrics.as_ref().unwrap();
        assert_eq!(spanmetrics.metrics_namespace(), "app_traces_spanmetrics");
        assert_eq!(
            spanmetrics.latency_histogram_buckets,
            vec![Duration::from_millis(2), Duration::from_secs(1)]
        );
    }

    #[test]
    fn test_default_namespace() {
        assert_eq!(
            SpanMetricsConfig::default().metrics_namespace(),
            "traces_spanmetrics"
        );
    }

    #[test]
    fn test_receiver_protocol_without_body() {
        let cfg: OtlpReceiverConfig =
            serde_json::from_value(json!({ "protocols": { "grpc": null } })).unwrap();
        assert_eq!(cfg.protocols.grpc, Some(ProtocolConfig::default()));
        assert!(cfg.protocols.http.is_none());
    }

    #[test]
    fn test_receiver_rejects_unknown_fields() {
        let err = serde_json::from_value::<ZipkinReceiverConfig>(json!({ "endpont": "x" }));
        assert!(err.is_err());
    }
}
