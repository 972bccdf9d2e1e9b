//! Tracing pipeline converters.
//!
//! A pipeline becomes `receivers -> attributes -> batch -> exporters`, each
//! stage forwarding its `output` to the `input` of the next. Span metrics
//! add `otelcol.connector.spanmetrics -> otelcol.exporter.prometheus`,
//! sending to the metrics remote write.

use std::time::Duration;

use flowconv_common::{Reference, label_with_index, sanitize_identifier};
use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

use super::describe;
use crate::build::{Block, PrometheusBlocks};
use crate::component::otelcol::*;
use crate::component::relabel::{PrometheusRelabelArguments, RuleArguments};
use crate::error::{ConvertError, Result};
use crate::legacy::RelabelConfig;
use crate::legacy::traces::{
    AttributesProcessorConfig, BatchProcessorConfig, ProtocolConfig, ReceiverConfig,
    SpanMetricsConfig, TracesConfig, TracesInstanceConfig, TracesRemoteWriteConfig,
    decode_processor,
};

const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_millis(200);
const DEFAULT_BATCH_SIZE: u32 = 8192;

/// Default span metrics latency buckets.
const DEFAULT_LATENCY_BUCKETS: [Duration; 16] = [
    Duration::from_millis(2),
    Duration::from_millis(4),
    Duration::from_millis(6),
    Duration::from_millis(8),
    Duration::from_millis(10),
    Duration::from_millis(50),
    Duration::from_millis(100),
    Duration::from_millis(200),
    Duration::from_millis(400),
    Duration::from_millis(800),
    Duration::from_secs(1),
    Duration::from_millis(1400),
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(15),
];

/// Convert every tracing pipeline.
///
/// The returned blocks are emitted after the metrics pipeline. The relabel
/// component synthesized for span metrics constant labels goes into `pb`.
pub fn convert_traces(
    pb: &mut PrometheusBlocks,
    cfg: &TracesConfig,
    metrics_receiver: Option<&Reference>,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    for instance in &cfg.configs {
        blocks.extend(convert_instance(pb, instance, metrics_receiver)?);
    }
    Ok(blocks)
}

struct Pipeline<'a> {
    name: &'a str,
    summary: String,
}

impl Pipeline<'_> {
    fn label(&self, component: &str) -> Result<String> {
        sanitize_identifier(&format!("{}_{}", self.name, component))
            .map_err(|e| ConvertError::label(format!("traces pipeline {:?}", self.name), e))
    }

    fn block<T: Serialize>(&self, name: &[&str], label: String, args: &T) -> Result<Block> {
        Ok(describe(Block::new(name, label, args)?, &self.summary))
    }
}

fn convert_instance(
    pb: &mut PrometheusBlocks,
    instance: &TracesInstanceConfig,
    metrics_receiver: Option<&Reference>,
) -> Result<Vec<Block>> {
    let name = if instance.name.is_empty() {
        "default"
    } else {
        instance.name.as_str()
    };
    let pipeline = Pipeline {
        name,
        summary: format!("Converted traces config {:?} into...", name),
    };

    let mut sinks = Vec::new();
    let mut exporter_blocks = Vec::new();

    for (index, rw) in instance.remote_write.iter().enumerate() {
        let kind = match rw.protocol.as_str() {
            "grpc" => "otlp",
            "http" => "otlphttp",
            _ => continue,
        };
        let label = label_with_index(index, &pipeline.label(kind)?);

        let auth = match &rw.basic_auth {
            Some(basic) => {
                let block = pipeline.block(
                    &["otelcol", "auth", "basic"],
                    label.clone(),
                    &BasicAuthArguments {
                        username: basic.username.clone(),
                        password: SecretString::from(basic.password.clone().unwrap_or_default()),
                    },
                )?;
                let handler = block.reference("handler");
                exporter_blocks.push(block);
                Some(handler)
            }
            None => None,
        };

        let block = pipeline.block(
            &["otelcol", "exporter", kind],
            label,
            &to_exporter_arguments(rw, auth),
        )?;
        sinks.push(block.reference("input"));
        exporter_blocks.push(block);
    }

    let spanmetrics = instance
        .spanmetrics
        .as_ref()
        .filter(|s| s.handler_endpoint.is_empty());
    if let (Some(spanmetrics), Some(receiver)) = (spanmetrics, metrics_receiver) {
        let (input, blocks) = convert_spanmetrics(pb, &pipeline, spanmetrics, receiver)?;
        sinks.push(input);
        exporter_blocks.extend(blocks);
    }

    let mut next = sinks;
    let mut processor_blocks = Vec::new();

    if let Some(Ok(batch)) = instance.batch.as_ref().map(decode_processor::<BatchProcessorConfig>) {
        let block = pipeline.block(
            &["otelcol", "processor", "batch"],
            pipeline.label("batch")?,
            &BatchProcessorArguments {
                timeout: batch.timeout.unwrap_or(DEFAULT_BATCH_TIMEOUT),
                send_batch_size: batch.send_batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
                send_batch_max_size: batch.send_batch_max_size.unwrap_or(0),
                output: OutputArguments::traces(next),
            },
        )?;
        next = vec![block.reference("input")];
        processor_blocks.push(block);
    }

    if let Some(Ok(attributes)) = instance
        .attributes
        .as_ref()
        .map(decode_processor::<AttributesProcessorConfig>)
    {
        let block = pipeline.block(
            &["otelcol", "processor", "attributes"],
            pipeline.label("attributes")?,
            &AttributesProcessorArguments {
                action: attributes
                    .actions
                    .into_iter()
                    .map(|a| AttributeActionArguments {
                        key: a.key,
                        value: a.value,
                        from_attribute: a.from_attribute,
                        action: a.action,
                    })
                    .collect(),
                output: OutputArguments::traces(next),
            },
        )?;
        next = vec![block.reference("input")];
        processor_blocks.push(block);
    }
    // Built back to front; emit front to back.
    processor_blocks.reverse();

    let mut blocks = Vec::new();
    for (kind, fragment) in &instance.receivers {
        let Some(Ok(receiver)) = ReceiverConfig::decode(kind, fragment) else {
            continue;
        };
        let output = OutputArguments::traces(next.clone());
        let label = pipeline.label(kind)?;
        let block = match receiver {
            ReceiverConfig::Otlp(cfg) => pipeline.block(
                &["otelcol", "receiver", "otlp"],
                label,
                &OtlpReceiverArguments {
                    grpc: server(&cfg.protocols.grpc, "0.0.0.0:4317"),
                    http: server(&cfg.protocols.http, "0.0.0.0:4318"),
                    output,
                },
            )?,
            ReceiverConfig::Jaeger(cfg) => pipeline.block(
                &["otelcol", "receiver", "jaeger"],
                label,
                &JaegerReceiverArguments {
                    protocols: JaegerProtocolArguments {
                        grpc: server(&cfg.protocols.grpc, "0.0.0.0:14250"),
                        thrift_http: server(&cfg.protocols.thrift_http, "0.0.0.0:14268"),
                        thrift_binary: server(&cfg.protocols.thrift_binary, "0.0.0.0:6832"),
                        thrift_compact: server(&cfg.protocols.thrift_compact, "0.0.0.0:6831"),
                    },
                    output,
                },
            )?,
            ReceiverConfig::Zipkin(cfg) => pipeline.block(
                &["otelcol", "receiver", "zipkin"],
                label,
                &ZipkinReceiverArguments {
                    endpoint: cfg.endpoint.unwrap_or_else(|| "0.0.0.0:9411".to_string()),
                    parse_string_tags: cfg.parse_string_tags,
                    output,
                },
            )?,
        };
        blocks.push(block);
    }

    blocks.extend(processor_blocks);
    blocks.extend(exporter_blocks);

    debug!(pipeline = %name, blocks = blocks.len(), "Converted traces pipeline");
    Ok(blocks)
}

/// Span metrics connector and its prometheus exporter.
///
/// Constant labels become `replace` rules of a `prometheus.relabel`
/// component placed between the exporter and the metrics receiver.
fn convert_spanmetrics(
    pb: &mut PrometheusBlocks,
    pipeline: &Pipeline<'_>,
    cfg: &SpanMetricsConfig,
    metrics_receiver: &Reference,
) -> Result<(Reference, Vec<Block>)> {
    let label = pipeline.label("spanmetrics")?;

    let mut exporter = PrometheusExporterArguments {
        forward_to: vec![metrics_receiver.clone()],
    };

    if !cfg.const_labels.is_empty() {
        let relabel = pipeline.block(
            &["prometheus", "relabel"],
            label.clone(),
            &PrometheusRelabelArguments {
                forward_to: exporter.forward_to.clone(),
                rule: cfg
                    .const_labels
                    .iter()
                    .map(|(name, value)| RuleArguments::from(&RelabelConfig::replace(name, value)))
                    .collect(),
            },
        )?;
        exporter.forward_to = vec![relabel.reference("receiver")];
        pb.append_relabel_block(relabel);
    }

    let exporter_block = pipeline.block(&["otelcol", "exporter", "prometheus"], label.clone(), &exporter)?;

    let buckets = if cfg.latency_histogram_buckets.is_empty() {
        DEFAULT_LATENCY_BUCKETS.to_vec()
    } else {
        cfg.latency_histogram_buckets.clone()
    };
    let connector_block = pipeline.block(
        &["otelcol", "connector", "spanmetrics"],
        label,
        &SpanMetricsConnectorArguments {
            dimension: cfg
                .dimensions
                .iter()
                .map(|d| DimensionArguments {
                    name: d.name.clone(),
                    default: d.default.clone(),
                })
                .collect(),
            namespace: cfg.metrics_namespace(),
            histogram: HistogramArguments {
                explicit: ExplicitBucketsArguments { buckets },
            },
            output: OutputArguments::metrics(vec![exporter_block.reference("input")]),
        },
    )?;

    Ok((
        connector_block.reference("input"),
        vec![connector_block, exporter_block],
    ))
}

fn to_exporter_arguments(
    rw: &TracesRemoteWriteConfig,
    auth: Option<Reference>,
) -> OtlpExporterArguments {
    let tls = rw.tls_config.clone().unwrap_or_default();
    OtlpExporterArguments {
        client: ExporterClientArguments {
            endpoint: rw.endpoint.clone(),
            compression: rw.compression.clone(),
            headers: rw.headers.clone(),
            auth,
            tls: ClientTlsArguments {
                insecure: rw.insecure,
                insecure_skip_verify: rw.insecure_skip_verify || tls.insecure_skip_verify,
                ca_file: tls.ca_file,
                cert_file: tls.cert_file,
                key_file: tls.key_file,
                server_name: tls.server_name,
            },
        },
        sending_queue: rw.sending_queue.clone(),
        retry_on_failure: rw.retry_on_failure.clone(),
    }
}

fn server(protocol: &Option<ProtocolConfig>, default_endpoint: &str) -> Option<ServerArguments> {
    protocol.as_ref().map(|p| ServerArguments {
        endpoint: p
            .endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint.to_string()),
    })
}
