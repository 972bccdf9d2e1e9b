use flowconv_common::{Diagnostics, Severity};

use crate::legacy::TracesConfig;
use crate::legacy::traces::{
    AttributesProcessorConfig, BatchProcessorConfig, ReceiverConfig, TracesInstanceConfig,
    decode_processor,
};

/// Validate every tracing pipeline.
///
/// `has_metrics_remote_write` tells whether a metrics remote write exists
/// for span metrics to be sent to.
pub fn validate_traces(cfg: &TracesConfig, has_metrics_remote_write: bool) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for instance in &cfg.configs {
        diags.add_all(validate_instance(instance, has_metrics_remote_write));
    }
    diags
}

fn validate_instance(instance: &TracesInstanceConfig, has_metrics_remote_write: bool) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let pipeline = if instance.name.is_empty() {
        "default"
    } else {
        instance.name.as_str()
    };

    for (kind, fragment) in &instance.receivers {
        match ReceiverConfig::decode(kind, fragment) {
            None => diags.add(
                Severity::Critical,
                format!(
                    "The converter does not support converting the provided {} receiver in traces pipeline {}.",
                    kind, pipeline
                ),
            ),
            Some(Err(e)) => diags.add(
                Severity::Critical,
                format!("failed to decode the {} receiver in traces pipeline {}: {}", kind, pipeline, e),
            ),
            Some(Ok(_)) => {}
        }
    }

    if let Some(Err(e)) = instance
        .attributes
        .as_ref()
        .map(decode_processor::<AttributesProcessorConfig>)
    {
        diags.add(
            Severity::Critical,
            format!("failed to decode the attributes processor in traces pipeline {}: {}", pipeline, e),
        );
    }
    if let Some(Err(e)) = instance.batch.as_ref().map(decode_processor::<BatchProcessorConfig>) {
        diags.add(
            Severity::Critical,
            format!("failed to decode the batch processor in traces pipeline {}: {}", pipeline, e),
        );
    }

    for rw in &instance.remote_write {
        if rw.protocol != "grpc" && rw.protocol != "http" {
            diags.add(
                Severity::Critical,
                format!(
                    "unsupported remote_write protocol {:?} in traces pipeline {}",
                    rw.protocol, pipeline
                ),
            );
        }
    }

    if let Some(spanmetrics) = &instance.spanmetrics {
        if !spanmetrics.handler_endpoint.is_empty() {
            diags.add_unsupported(
                Severity::Critical,
                "traces spanmetrics handler_endpoint",
                "span metrics can only be sent to a metrics remote_write.",
            );
        }
        if !has_metrics_remote_write {
            diags.add(
                Severity::Critical,
                format!(
                    "spanmetrics in traces pipeline {} needs a metrics remote_write to send to",
                    pipeline
                ),
            );
        }
    }

    if !instance.scrape_configs.is_empty() {
        diags.add_unsupported(Severity::Critical, "traces scrape_configs", "");
    }
    if instance.automatic_logging.is_some() {
        diags.add_unsupported(Severity::Critical, "traces automatic_logging", "");
    }
    if instance.tail_sampling.is_some() {
        diags.add_unsupported(Severity::Critical, "traces tail_sampling", "");
    }
    if instance.load_balancing.is_some() {
        diags.add_unsupported(Severity::Critical, "traces load_balancing", "");
    }
    if instance.service_graphs.is_some() {
        diags.add_unsupported(Severity::Critical, "traces service_graphs", "");
    }

    diags
}
