//! The legacy monolithic agent configuration.
//!
//! This is the converter's input. It is deserialized once and never mutated.

pub mod discovery;
pub mod duration;
pub mod http;
pub mod integrations;
pub mod relabel;
pub mod traces;

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use discovery::SdConfig;
pub use http::HttpClientConfig;
pub use integrations::IntegrationsConfig;
pub use relabel::{Action, RelabelConfig};
pub use traces::TracesConfig;

/// Root of the legacy configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    pub global: GlobalConfig,
    pub alerting: Option<AlertingConfig>,
    pub rule_files: Vec<String>,
    pub scrape_configs: Vec<ScrapeConfig>,
    pub storage: StorageConfig,
    pub tracing: TracingConfig,
    pub remote_write: Vec<RemoteWriteConfig>,
    pub remote_read: Vec<RemoteReadConfig>,
    pub integrations: Option<IntegrationsConfig>,
    pub traces: Option<TracesConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    #[serde(with = "duration::required")]
    pub scrape_interval: Duration,
    #[serde(with = "duration::required")]
    pub scrape_timeout: Duration,
    #[serde(with = "duration::required")]
    pub evaluation_interval: Duration,
    pub external_labels: BTreeMap<String, String>,
    pub query_log_file: Option<String>,
}

pub const DEFAULT_SCRAPE_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_EVALUATION_INTERVAL: Duration = Duration::from_secs(60);

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            scrape_interval: DEFAULT_SCRAPE_INTERVAL,
            scrape_timeout: DEFAULT_SCRAPE_TIMEOUT,
            evaluation_interval: DEFAULT_EVALUATION_INTERVAL,
            external_labels: BTreeMap::new(),
            query_log_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlertingConfig {
    pub alert_relabel_configs: Vec<RelabelConfig>,
    pub alertmanagers: Vec<serde_json::Value>,
}

impl AlertingConfig {
    pub fn is_empty(&self) -> bool {
        self.alert_relabel_configs.is_empty() && self.alertmanagers.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub tsdb: Option<serde_json::Value>,
    pub exemplars: Option<serde_json::Value>,
}

impl StorageConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Tracing of the legacy server itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub client_type: Option<String>,
    pub endpoint: Option<String>,
    pub sampling_fraction: Option<f64>,
    pub insecure: bool,
    pub timeout: Option<String>,
    pub compression: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl TracingConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// One scrape job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub job_name: String,
    pub honor_labels: bool,
    pub honor_timestamps: bool,
    pub params: BTreeMap<String, Vec<String>>,
    #[serde(with = "duration::option")]
    pub scrape_interval: Option<Duration>,
    #[serde(with = "duration::option")]
    pub scrape_timeout: Option<Duration>,
    pub metrics_path: String,
    pub scheme: String,
    pub body_size_limit: u64,
    pub sample_limit: u64,
    pub target_limit: u64,
    pub label_limit: u64,
    pub label_name_length_limit: u64,
    pub label_value_length_limit: u64,
    pub relabel_configs: Vec<RelabelConfig>,
    pub metric_relabel_configs: Vec<RelabelConfig>,

    pub static_configs: Vec<discovery::StaticConfig>,
    pub consul_sd_configs: Vec<discovery::ConsulSdConfig>,
    pub docker_sd_configs: Vec<discovery::DockerSdConfig>,
    pub kubernetes_sd_configs: Vec<discovery::KubernetesSdConfig>,
    pub marathon_sd_configs: Vec<discovery::MarathonSdConfig>,
    pub kuma_sd_configs: Vec<discovery::KumaSdConfig>,
    pub linode_sd_configs: Vec<discovery::LinodeSdConfig>,
    pub http_sd_configs: Vec<discovery::HttpSdConfig>,
    pub dns_sd_configs: Vec<discovery::DnsSdConfig>,
    pub file_sd_configs: Vec<discovery::FileSdConfig>,
    pub gce_sd_configs: Vec<discovery::GceSdConfig>,
    pub ionos_sd_configs: Vec<discovery::IonosSdConfig>,
    pub triton_sd_configs: Vec<discovery::TritonSdConfig>,
    pub openstack_sd_configs: Vec<discovery::OpenstackSdConfig>,
    pub nerve_sd_configs: Vec<discovery::NerveSdConfig>,
    pub serverset_sd_configs: Vec<discovery::ServersetSdConfig>,

    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            job_name: String::new(),
            honor_labels: false,
            honor_timestamps: true,
            params: BTreeMap::new(),
            scrape_interval: None,
            scrape_timeout: None,
            metrics_path: "/metrics".to_string(),
            scheme: "http".to_string(),
            body_size_limit: 0,
            sample_limit: 0,
            target_limit: 0,
            label_limit: 0,
            label_name_length_limit: 0,
            label_value_length_limit: 0,
            relabel_configs: Vec::new(),
            metric_relabel_configs: Vec::new(),
            static_configs: Vec::new(),
            consul_sd_configs: Vec::new(),
            docker_sd_configs: Vec::new(),
            kubernetes_sd_configs: Vec::new(),
            marathon_sd_configs: Vec::new(),
            kuma_sd_configs: Vec::new(),
            linode_sd_configs: Vec::new(),
            http_sd_configs: Vec::new(),
            dns_sd_configs: Vec::new(),
            file_sd_configs: Vec::new(),
            gce_sd_configs: Vec::new(),
            ionos_sd_configs: Vec::new(),
            triton_sd_configs: Vec::new(),
            openstack_sd_configs: Vec::new(),
            nerve_sd_configs: Vec::new(),
            serverset_sd_configs: Vec::new(),
            http_client_config: HttpClientConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// All service discovery configs of this job, grouped by family in a
    /// fixed order.
    pub fn service_discovery_configs(&self) -> Vec<SdConfig> {
        let mut configs = Vec::new();
        configs.extend(self.static_configs.iter().cloned().map(SdConfig::Static));
        configs.extend(self.consul_sd_configs.iter().cloned().map(SdConfig::Consul));
        configs.extend(self.docker_sd_configs.iter().cloned().map(SdConfig::Docker));
        configs.extend(self.kubernetes_sd_configs.iter().cloned().map(SdConfig::Kubernetes));
        configs.extend(self.marathon_sd_configs.iter().cloned().map(SdConfig::Marathon));
        configs.extend(self.kuma_sd_configs.iter().cloned().map(SdConfig::Kuma));
        configs.extend(self.linode_sd_configs.iter().cloned().map(SdConfig::Linode));
        configs.extend(self.http_sd_configs.iter().cloned().map(SdConfig::Http));
        configs.extend(self.dns_sd_configs.iter().cloned().map(SdConfig::Dns));
        configs.extend(self.file_sd_configs.iter().cloned().map(SdConfig::File));
        configs.extend(self.gce_sd_configs.iter().cloned().map(SdConfig::Gce));
        configs.extend(self.ionos_sd_configs.iter().cloned().map(SdConfig::Ionos));
        configs.extend(self.triton_sd_configs.iter().cloned().map(SdConfig::Triton));
        configs.extend(self.openstack_sd_configs.iter().cloned().map(SdConfig::Openstack));
        configs.extend(self.nerve_sd_configs.iter().cloned().map(SdConfig::Nerve));
        configs.extend(self.serverset_sd_configs.iter().cloned().map(SdConfig::Serverset));
        configs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub capacity: u32,
    pub max_shards: u32,
    pub min_shards: u32,
    pub max_samples_per_send: u32,
    #[serde(with = "duration::required")]
    pub batch_send_deadline: Duration,
    #[serde(with = "duration::required")]
    pub min_backoff: Duration,
    #[serde(with = "duration::required")]
    pub max_backoff: Duration,
    pub retry_on_http_429: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 2500,
            max_shards: 200,
            min_shards: 1,
            max_samples_per_send: 500,
            batch_send_deadline: Duration::from_secs(5),
            min_backoff: Duration::from_millis(30),
            max_backoff: Duration::from_secs(5),
            retry_on_http_429: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub send: bool,
    #[serde(with = "duration::required")]
    pub send_interval: Duration,
    pub max_samples_per_send: u32,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            send: true,
            send_interval: Duration::from_secs(60),
            max_samples_per_send: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteWriteConfig {
    pub url: String,
    pub name: Option<String>,
    #[serde(with = "duration::required")]
    pub remote_timeout: Duration,
    pub headers: BTreeMap<String, String>,
    pub write_relabel_configs: Vec<RelabelConfig>,
    pub send_exemplars: bool,
    pub send_native_histograms: bool,
    pub queue_config: QueueConfig,
    pub metadata_config: MetadataConfig,
    pub sigv4: Option<serde_json::Value>,
    pub azuread: Option<serde_json::Value>,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for RemoteWriteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            name: None,
            remote_timeout: Duration::from_secs(30),
            headers: BTreeMap::new(),
            write_relabel_configs: Vec::new(),
            send_exemplars: true,
            send_native_histograms: false,
            queue_config: QueueConfig::default(),
            metadata_config: MetadataConfig::default(),
            sigv4: None,
            azuread: None,
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteReadConfig {
    pub url: String,
    pub name: Option<String>,
    pub read_recent: bool,
    pub required_matchers: BTreeMap<String, String>,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}
