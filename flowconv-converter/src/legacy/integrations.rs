//! Legacy integrations.
//!
//! Each integration's settings are kept untyped here and decoded into the
//! matching typed config only when that integration is converted.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use super::duration;
use super::http::TlsConfig;
use super::relabel::RelabelConfig;
use super::RemoteWriteConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    pub scrape_integrations: bool,
    #[serde(with = "duration::option")]
    pub scrape_interval: Option<Duration>,
    #[serde(with = "duration::option")]
    pub scrape_timeout: Option<Duration>,
    pub http_tls_config: TlsConfig,
    pub prometheus_remote_write: Vec<RemoteWriteConfig>,
    /// Integration settings keyed by integration name.
    #[serde(flatten)]
    pub configs: BTreeMap<String, serde_json::Value>,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            scrape_integrations: true,
            scrape_interval: None,
            scrape_timeout: None,
            http_tls_config: TlsConfig::default(),
            prometheus_remote_write: Vec::new(),
            configs: BTreeMap::new(),
        }
    }
}

/// An integration listed without settings uses its defaults.
fn or_empty(fragment: &serde_json::Value) -> std::borrow::Cow<'_, serde_json::Value> {
    if fragment.is_null() {
        std::borrow::Cow::Owned(serde_json::Value::Object(serde_json::Map::new()))
    } else {
        std::borrow::Cow::Borrowed(fragment)
    }
}

/// Settings shared by every integration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    pub enabled: bool,
    pub instance: Option<String>,
    pub scrape_integration: Option<bool>,
    #[serde(with = "duration::option")]
    pub scrape_interval: Option<Duration>,
    #[serde(with = "duration::option")]
    pub scrape_timeout: Option<Duration>,
    pub relabel_configs: Vec<RelabelConfig>,
    pub metric_relabel_configs: Vec<RelabelConfig>,
    #[serde(with = "duration::option")]
    pub wal_truncate_frequency: Option<Duration>,
}

impl IntegrationsConfig {
    /// Read the shared settings of one integration, ignoring its own fields.
    pub fn common(&self, name: &str) -> Option<flowconv_common::Result<CommonConfig>> {
        self.configs
            .get(name)
            .map(|fragment| flowconv_common::decode_untyped(or_empty(fragment).as_ref()))
    }

    /// Whether the integration will be scraped, honoring its own override.
    pub fn is_scraped(&self, common: &CommonConfig) -> bool {
        common.scrape_integration.unwrap_or(self.scrape_integrations)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentIntegrationConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeExporterConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub include_exporter_metrics: bool,
    pub procfs_path: String,
    pub sysfs_path: String,
    pub rootfs_path: String,
    pub enable_collectors: Vec<String>,
    pub disable_collectors: Vec<String>,
    pub set_collectors: Vec<String>,
    pub filesystem_fs_types_exclude: Option<String>,
    pub filesystem_mount_points_exclude: Option<String>,
    #[serde(with = "duration::required")]
    pub filesystem_mount_timeout: Duration,
    pub netclass_ignored_devices: Option<String>,
    pub supervisord_url: Option<String>,
    pub textfile_directory: Option<String>,
}

impl Default for NodeExporterConfig {
    fn default() -> Self {
        Self {
            common: CommonConfig::default(),
            include_exporter_metrics: false,
            procfs_path: "/proc".to_string(),
            sysfs_path: "/sys".to_string(),
            rootfs_path: "/".to_string(),
            enable_collectors: Vec::new(),
            disable_collectors: Vec::new(),
            set_collectors: Vec::new(),
            filesystem_fs_types_exclude: None,
            filesystem_mount_points_exclude: None,
            filesystem_mount_timeout: Duration::from_secs(5),
            netclass_ignored_devices: None,
            supervisord_url: None,
            textfile_directory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RedisExporterConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub redis_addr: String,
    pub redis_user: Option<String>,
    pub redis_password: Option<String>,
    pub redis_password_file: Option<String>,
    pub namespace: String,
    pub check_keys: Vec<String>,
    pub include_exporter_metrics: bool,
}

impl Default for RedisExporterConfig {
    fn default() -> Self {
        Self {
            common: CommonConfig::default(),
            redis_addr: String::new(),
            redis_user: None,
            redis_password: None,
            redis_password_file: None,
            namespace: "redis".to_string(),
            check_keys: Vec::new(),
            include_exporter_metrics: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MysqldExporterConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub data_source_name: String,
    pub enable_collectors: Vec<String>,
    pub disable_collectors: Vec<String>,
    pub lock_wait_timeout: u32,
    pub log_slow_filter: bool,
}

impl Default for MysqldExporterConfig {
    fn default() -> Self {
        Self {
            common: CommonConfig::default(),
            data_source_name: String::new(),
            enable_collectors: Vec::new(),
            disable_collectors: Vec::new(),
            lock_wait_timeout: 2,
            log_slow_filter: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostgresExporterConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub data_source_names: Vec<String>,
    pub disable_settings_metrics: bool,
    pub autodiscover_databases: bool,
    pub exclude_databases: Vec<String>,
    pub include_databases: Vec<String>,
    pub disable_default_metrics: bool,
    pub query_path: Option<String>,
}

/// A supported integration, decoded into its typed config.
#[derive(Debug, Clone, PartialEq)]
pub enum KnownIntegration {
    Agent(AgentIntegrationConfig),
    NodeExporter(NodeExporterConfig),
    RedisExporter(RedisExporterConfig),
    MysqldExporter(MysqldExporterConfig),
    PostgresExporter(PostgresExporterConfig),
}

impl KnownIntegration {
    /// Names of the integrations that can be converted.
    pub const NAMES: [&'static str; 5] = [
        "agent",
        "node_exporter",
        "redis_exporter",
        "mysqld_exporter",
        "postgres_exporter",
    ];

    /// Decode an integration fragment. `None` if the name is not supported.
    pub fn decode(
        name: &str,
        fragment: &serde_json::Value,
    ) -> Option<flowconv_common::Result<Self>> {
        use flowconv_common::decode_untyped;

        let fragment = or_empty(fragment);
        let fragment = fragment.as_ref();
        let decoded = match name {
            "agent" => decode_untyped(fragment).map(Self::Agent),
            "node_exporter" => decode_untyped(fragment).map(Self::NodeExporter),
            "redis_exporter" => decode_untyped(fragment).map(Self::RedisExporter),
            "mysqld_exporter" => decode_untyped(fragment).map(Self::MysqldExporter),
            "postgres_exporter" => decode_untyped(fragment).map(Self::PostgresExporter),
            _ => return None,
        };
        Some(decoded)
    }

    /// Last segment of the `prometheus.exporter.*` component name.
    pub fn exporter_name(&self) -> &'static str {
        match self {
            Self::Agent(_) => "self",
            Self::NodeExporter(_) => "unix",
            Self::RedisExporter(_) => "redis",
            Self::MysqldExporter(_) => "mysql",
            Self::PostgresExporter(_) => "postgres",
        }
    }

    pub fn common(&self) -> &CommonConfig {
        match self {
            Self::Agent(c) => &c.common,
            Self::NodeExporter(c) => &c.common,
            Self::RedisExporter(c) => &c.common,
            Self::MysqldExporter(c) => &c.common,
            Self::PostgresExporter(c) => &c.common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_common_and_flattened_map() {
        let cfg: IntegrationsConfig = serde_json::from_value(json!({
            "scrape_integrations": false,
            "node_exporter": { "enabled": true, "instance": "host-a", "rootfs_path": "/host" },
            "agent": { "enabled": true, "scrape_integration": true },
        }))
        .unwrap();

        assert_eq!(cfg.configs.len(), 2);
        let node = cfg.common("node_exporter").unwrap().unwrap();
        assert!(node.enabled);
        assert_eq!(node.instance.as_deref(), Some("host-a"));
        assert!(!cfg.is_scraped(&node));

        let agent = cfg.common("agent").unwrap().unwrap();
        assert!(cfg.is_scraped(&agent));
        assert!(cfg.common("redis_exporter").is_none());
    }

    #[test]
    fn test_common_decode_failure() {
        let cfg: IntegrationsConfig = serde_json::from_value(json!({
            "agent": { "enabled": "yes" },
        }))
        .unwrap();
        assert!(cfg.common("agent").unwrap().is_err());
    }

    #[test]
    fn test_node_exporter_defaults() {
        let cfg: NodeExporterConfig = serde_json::from_value(json!({ "enabled": true })).unwrap();
        assert!(cfg.common.enabled);
        assert_eq!(cfg.procfs_path, "/proc");
        assert_eq!(cfg.filesystem_mount_timeout, Duration::from_secs(5));
        assert!(cfg.filesystem_mount_points_exclude.is_none());
    }

    #[test]
    fn test_known_integration_decode() {
        let fragment = json!({ "enabled": true, "redis_addr": "localhost:6379" });
        let itg = KnownIntegration::decode("redis_exporter", &fragment).unwrap().unwrap();
        assert_eq!(itg.exporter_name(), "redis");
        assert!(itg.common().enabled);
        match itg {
            KnownIntegration::RedisExporter(cfg) => assert_eq!(cfg.namespace, "redis"),
            other => panic!("unexpected integration: {:?}", other),
        }

        assert!(KnownIntegration::decode("apache_http", &fragment).is_none());
        assert!(
            KnownIntegration::decode("mysqld_exporter", &json!({ "lock_wait_timeout": "x" }))
                .unwrap()
                .is_err()
        );
    }
}
