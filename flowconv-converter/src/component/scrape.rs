//! `prometheus.scrape` arguments.

use std::collections::BTreeMap;
use std::time::Duration;

use flowconv_common::Reference;
use serde::Serialize;

use super::discovery::HttpClientArguments;
use super::{TargetsExpr, is_zero};
use crate::legacy::duration;

#[derive(Debug, Serialize)]
pub struct ScrapeArguments {
    pub targets: TargetsExpr,
    pub forward_to: Vec<Reference>,
    pub job_name: String,
    pub honor_labels: bool,
    pub honor_timestamps: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Vec<String>>,
    #[serde(with = "duration::required")]
    pub scrape_interval: Duration,
    #[serde(with = "duration::required")]
    pub scrape_timeout: Duration,
    pub metrics_path: String,
    pub scheme: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub body_size_limit: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub sample_limit: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub target_limit: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub label_limit: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub label_name_length_limit: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub label_value_length_limit: u64,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}
