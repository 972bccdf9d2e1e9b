//! `otelcol.*` arguments for tracing pipelines.

use std::collections::BTreeMap;
use std::time::Duration;

use flowconv_common::Reference;
use secrecy::SecretString;
use serde::Serialize;

use super::{is_false, secret};
use crate::legacy::duration;

/// Where a component sends its output, per signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputArguments {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<Reference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<Reference>,
}

impl OutputArguments {
    pub fn traces(traces: Vec<Reference>) -> Self {
        Self {
            traces,
            ..Self::default()
        }
    }

    pub fn metrics(metrics: Vec<Reference>) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerArguments {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtlpReceiverArguments {
    pub grpc: Option<ServerArguments>,
    pub http: Option<ServerArguments>,
    pub output: OutputArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct JaegerProtocolArguments {
    pub grpc: Option<ServerArguments>,
    pub thrift_http: Option<ServerArguments>,
    pub thrift_binary: Option<ServerArguments>,
    pub thrift_compact: Option<ServerArguments>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JaegerReceiverArguments {
    pub protocols: JaegerProtocolArguments,
    pub output: OutputArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZipkinReceiverArguments {
    pub endpoint: String,
    #[serde(skip_serializing_if = "is_false")]
    pub parse_string_tags: bool,
    pub output: OutputArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeActionArguments {
    pub key: String,
    pub value: Option<serde_json::Value>,
    pub from_attribute: Option<String>,
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributesProcessorArguments {
    pub action: Vec<AttributeActionArguments>,
    pub output: OutputArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchProcessorArguments {
    #[serde(with = "duration::required")]
    pub timeout: Duration,
    pub send_batch_size: u32,
    pub send_batch_max_size: u32,
    pub output: OutputArguments,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientTlsArguments {
    #[serde(skip_serializing_if = "is_false")]
    pub insecure: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub insecure_skip_verify: bool,
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub server_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExporterClientArguments {
    pub endpoint: String,
    pub compression: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub auth: Option<Reference>,
    pub tls: ClientTlsArguments,
}

/// Shared by `otelcol.exporter.otlp` and `otelcol.exporter.otlphttp`.
#[derive(Debug, Clone, Serialize)]
pub struct OtlpExporterArguments {
    pub client: ExporterClientArguments,
    pub sending_queue: Option<serde_json::Value>,
    pub retry_on_failure: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct BasicAuthArguments {
    pub username: String,
    #[serde(serialize_with = "secret::serialize")]
    pub password: SecretString,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionArguments {
    pub name: String,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplicitBucketsArguments {
    #[serde(with = "duration::list")]
    pub buckets: Vec<Duration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramArguments {
    pub explicit: ExplicitBucketsArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpanMetricsConnectorArguments {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension: Vec<DimensionArguments>,
    pub namespace: String,
    pub histogram: HistogramArguments,
    pub output: OutputArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrometheusExporterArguments {
    pub forward_to: Vec<Reference>,
}
