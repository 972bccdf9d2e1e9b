//! `prometheus.remote_write` arguments.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::discovery::HttpClientArguments;
use super::relabel::RuleArguments;
use crate::legacy::{MetadataConfig, QueueConfig, duration};

#[derive(Debug, Default, Serialize)]
pub struct RemoteWriteArguments {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub external_labels: BTreeMap<String, String>,
    pub endpoint: Vec<EndpointArguments>,
}

#[derive(Debug, Serialize)]
pub struct EndpointArguments {
    pub name: Option<String>,
    pub url: String,
    #[serde(with = "duration::required")]
    pub remote_timeout: Duration,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub send_exemplars: bool,
    pub send_native_histograms: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub write_relabel_config: Vec<RuleArguments>,
    pub queue_config: QueueConfig,
    pub metadata_config: MetadataConfig,
    pub sigv4: Option<serde_json::Value>,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}
