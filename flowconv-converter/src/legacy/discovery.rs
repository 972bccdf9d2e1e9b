//! Service discovery configs of a scrape job.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use super::duration;
use super::http::{HttpClientConfig, TlsConfig};

/// One service discovery config, discriminated by family.
#[derive(Debug, Clone, PartialEq)]
pub enum SdConfig {
    Static(StaticConfig),
    Consul(ConsulSdConfig),
    Docker(DockerSdConfig),
    Kubernetes(KubernetesSdConfig),
    Marathon(MarathonSdConfig),
    Kuma(KumaSdConfig),
    Linode(LinodeSdConfig),
    Http(HttpSdConfig),
    Dns(DnsSdConfig),
    File(FileSdConfig),
    Gce(GceSdConfig),
    Ionos(IonosSdConfig),
    Triton(TritonSdConfig),
    Openstack(OpenstackSdConfig),
    Nerve(NerveSdConfig),
    Serverset(ServersetSdConfig),
}

impl SdConfig {
    /// Family name, also the last segment of the component name.
    pub fn family(&self) -> &'static str {
        match self {
            SdConfig::Static(_) => "static",
            SdConfig::Consul(_) => "consul",
            SdConfig::Docker(_) => "docker",
            SdConfig::Kubernetes(_) => "kubernetes",
            SdConfig::Marathon(_) => "marathon",
            SdConfig::Kuma(_) => "kuma",
            SdConfig::Linode(_) => "linode",
            SdConfig::Http(_) => "http",
            SdConfig::Dns(_) => "dns",
            SdConfig::File(_) => "file",
            SdConfig::Gce(_) => "gce",
            SdConfig::Ionos(_) => "ionos",
            SdConfig::Triton(_) => "triton",
            SdConfig::Openstack(_) => "openstack",
            SdConfig::Nerve(_) => "nerve",
            SdConfig::Serverset(_) => "serverset",
        }
    }

    /// The embedded HTTP client config of network-based families.
    pub fn http_client_config(&self) -> Option<&HttpClientConfig> {
        match self {
            SdConfig::Consul(c) => Some(&c.http_client_config),
            SdConfig::Docker(c) => Some(&c.http_client_config),
            SdConfig::Kubernetes(c) => Some(&c.http_client_config),
            SdConfig::Marathon(c) => Some(&c.http_client_config),
            SdConfig::Kuma(c) => Some(&c.http_client_config),
            SdConfig::Linode(c) => Some(&c.http_client_config),
            SdConfig::Http(c) => Some(&c.http_client_config),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub targets: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsulSdConfig {
    pub server: String,
    pub path_prefix: Option<String>,
    pub token: Option<String>,
    pub datacenter: Option<String>,
    pub namespace: Option<String>,
    pub partition: Option<String>,
    pub tag_separator: String,
    pub scheme: String,
    pub allow_stale: bool,
    pub services: Vec<String>,
    pub tags: Vec<String>,
    pub node_meta: BTreeMap<String, String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for ConsulSdConfig {
    fn default() -> Self {
        Self {
            server: "localhost:8500".to_string(),
            path_prefix: None,
            token: None,
            datacenter: None,
            namespace: None,
            partition: None,
            tag_separator: ",".to_string(),
            scheme: "http".to_string(),
            allow_stale: true,
            services: Vec::new(),
            tags: Vec::new(),
            node_meta: BTreeMap::new(),
            refresh_interval: Duration::from_secs(30),
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DockerFilter {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DockerSdConfig {
    pub host: String,
    pub port: u16,
    pub host_networking_host: String,
    pub filters: Vec<DockerFilter>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for DockerSdConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 80,
            host_networking_host: "localhost".to_string(),
            filters: Vec::new(),
            refresh_interval: Duration::from_secs(60),
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamespaceDiscovery {
    pub own_namespace: bool,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KubernetesSelector {
    pub role: String,
    pub label: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KubernetesSdConfig {
    pub api_server: Option<String>,
    pub role: String,
    pub kubeconfig_file: Option<String>,
    pub namespaces: Option<NamespaceDiscovery>,
    pub selectors: Vec<KubernetesSelector>,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarathonSdConfig {
    pub servers: Vec<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub auth_token: Option<String>,
    pub auth_token_file: Option<String>,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for MarathonSdConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            refresh_interval: Duration::from_secs(30),
            auth_token: None,
            auth_token_file: None,
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KumaSdConfig {
    pub server: String,
    pub client_id: Option<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(with = "duration::required")]
    pub fetch_timeout: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for KumaSdConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            client_id: None,
            refresh_interval: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(120),
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinodeSdConfig {
    pub region: Option<String>,
    pub port: u16,
    pub tag_separator: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for LinodeSdConfig {
    fn default() -> Self {
        Self {
            region: None,
            port: 80,
            tag_separator: ",".to_string(),
            refresh_interval: Duration::from_secs(60),
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpSdConfig {
    pub url: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl Default for HttpSdConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            refresh_interval: Duration::from_secs(60),
            http_client_config: HttpClientConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DnsSdConfig {
    pub names: Vec<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(rename = "type")]
    pub record_type: String,
    pub port: u16,
}

impl Default for DnsSdConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            refresh_interval: Duration::from_secs(30),
            record_type: "SRV".to_string(),
            port: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileSdConfig {
    pub files: Vec<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
}

impl Default for FileSdConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            refresh_interval: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GceSdConfig {
    pub project: String,
    pub zone: String,
    pub filter: Option<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub port: u16,
    pub tag_separator: String,
}

impl Default for GceSdConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            zone: String::new(),
            filter: None,
            refresh_interval: Duration::from_secs(60),
            port: 80,
            tag_separator: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IonosSdConfig {
    pub datacenter_id: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub port: u16,
}

impl Default for IonosSdConfig {
    fn default() -> Self {
        Self {
            datacenter_id: String::new(),
            refresh_interval: Duration::from_secs(60),
            port: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TritonSdConfig {
    pub account: String,
    pub role: String,
    pub dns_suffix: String,
    pub endpoint: String,
    pub groups: Vec<String>,
    pub port: u16,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub version: u32,
    pub tls_config: TlsConfig,
}

impl Default for TritonSdConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            role: "container".to_string(),
            dns_suffix: String::new(),
            endpoint: String::new(),
            groups: Vec::new(),
            port: 9163,
            refresh_interval: Duration::from_secs(60),
            version: 1,
            tls_config: TlsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpenstackSdConfig {
    pub role: String,
    pub region: String,
    pub identity_endpoint: Option<String>,
    pub username: Option<String>,
    pub userid: Option<String>,
    pub password: Option<String>,
    pub domain_name: Option<String>,
    pub domain_id: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub application_credential_name: Option<String>,
    pub application_credential_id: Option<String>,
    pub application_credential_secret: Option<String>,
    pub all_tenants: bool,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub port: u16,
    pub availability: String,
    pub tls_config: TlsConfig,
}

impl Default for OpenstackSdConfig {
    fn default() -> Self {
        Self {
            role: String::new(),
            region: String::new(),
            identity_endpoint: None,
            username: None,
            userid: None,
            password: None,
            domain_name: None,
            domain_id: None,
            project_name: None,
            project_id: None,
            application_credential_name: None,
            application_credential_id: None,
            application_credential_secret: None,
            all_tenants: false,
            refresh_interval: Duration::from_secs(60),
            port: 80,
            availability: "public".to_string(),
            tls_config: TlsConfig::default(),
        }
    }
}

/// Shared shape of the Zookeeper-based families (nerve, serverset).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZookeeperSdConfig {
    pub servers: Vec<String>,
    pub paths: Vec<String>,
    #[serde(with = "duration::required")]
    pub timeout: Duration,
}

impl Default for ZookeeperSdConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            paths: Vec::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub type NerveSdConfig = ZookeeperSdConfig;
pub type ServersetSdConfig = ZookeeperSdConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consul_defaults_and_flattened_client() {
        let cfg: ConsulSdConfig = serde_json::from_str(
            r#"{"server": "consul.example.com:8500", "bearer_token": "tok", "refresh_interval": "1m"}"#,
        )
        .unwrap();

        assert_eq!(cfg.server, "consul.example.com:8500");
        assert_eq!(cfg.refresh_interval, Duration::from_secs(60));
        assert_eq!(cfg.tag_separator, ",");
        assert!(cfg.allow_stale);
        assert_eq!(cfg.http_client_config.bearer_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_family_dispatch() {
        let dns = SdConfig::Dns(DnsSdConfig::default());
        assert_eq!(dns.family(), "dns");
        assert!(dns.http_client_config().is_none());

        let kuma = SdConfig::Kuma(KumaSdConfig::default());
        assert_eq!(kuma.family(), "kuma");
        assert!(kuma.http_client_config().is_some());
    }

    #[test]
    fn test_dns_type_field() {
        let cfg: DnsSdConfig = serde_json::from_str(r#"{"names": ["a.example"], "type": "A", "port": 9100}"#).unwrap();
        assert_eq!(cfg.record_type, "A");
        assert_eq!(cfg.port, 9100);
    }
}
