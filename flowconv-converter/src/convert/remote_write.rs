use std::collections::BTreeMap;

use super::describe;
use super::http::to_http_client_arguments;
use crate::build::{Block, PrometheusBlocks};
use crate::component::ReceiverExports;
use crate::component::relabel::rules;
use crate::component::remote_write::{EndpointArguments, RemoteWriteArguments};
use crate::error::Result;
use crate::legacy::RemoteWriteConfig;

/// Convert every remote write entry into one endpoint of a single
/// `prometheus.remote_write` block.
///
/// Returns `None` and emits nothing when there are no entries.
pub fn append_remote_write(
    pb: &mut PrometheusBlocks,
    label: &str,
    remote_write: &[RemoteWriteConfig],
    external_labels: &BTreeMap<String, String>,
) -> Result<Option<ReceiverExports>> {
    if remote_write.is_empty() {
        return Ok(None);
    }

    let args = RemoteWriteArguments {
        external_labels: external_labels.clone(),
        endpoint: remote_write.iter().map(to_endpoint_arguments).collect(),
    };

    let summary = format!(
        "Converted {} remote_write[s] {:?} into...",
        remote_write.len(),
        label
    );
    let block = describe(
        Block::new(&["prometheus", "remote_write"], label, &args)?,
        &summary,
    );
    let exports = ReceiverExports::new(block.reference("receiver"));
    pb.append_remote_write_block(block);

    Ok(Some(exports))
}

fn to_endpoint_arguments(rw: &RemoteWriteConfig) -> EndpointArguments {
    EndpointArguments {
        name: rw.name.clone(),
        url: rw.url.clone(),
        remote_timeout: rw.remote_timeout,
        headers: rw.headers.clone(),
        send_exemplars: rw.send_exemplars,
        send_native_histograms: rw.send_native_histograms,
        write_relabel_config: rules(&rw.write_relabel_configs),
        queue_config: rw.queue_config.clone(),
        metadata_config: rw.metadata_config.clone(),
        sigv4: rw.sigv4.clone(),
        http_client_config: to_http_client_arguments(&rw.http_client_config),
    }
}
