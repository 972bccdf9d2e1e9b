//! `prometheus.exporter.*` arguments for the supported integrations.

use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;

use super::{is_false, secret};
use crate::legacy::duration;

/// `prometheus.exporter.self` takes no arguments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelfArguments {}

#[derive(Debug, Clone, Serialize)]
pub struct UnixArguments {
    #[serde(skip_serializing_if = "is_false")]
    pub include_exporter_metrics: bool,
    pub procfs_path: String,
    pub sysfs_path: String,
    pub rootfs_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enable_collectors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disable_collectors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub set_collectors: Vec<String>,
    pub filesystem: FilesystemArguments,
    pub netclass: NetclassArguments,
    pub supervisord: SupervisordArguments,
    pub textfile: TextfileArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilesystemArguments {
    pub fs_types_exclude: String,
    pub mount_points_exclude: String,
    #[serde(with = "duration::required")]
    pub mount_timeout: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetclassArguments {
    pub ignored_devices: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupervisordArguments {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextfileArguments {
    pub directory: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RedisArguments {
    pub redis_addr: String,
    pub redis_user: Option<String>,
    #[serde(serialize_with = "secret::option")]
    pub redis_password: Option<SecretString>,
    pub redis_password_file: Option<String>,
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub check_keys: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub include_exporter_metrics: bool,
}

#[derive(Debug, Serialize)]
pub struct MysqlArguments {
    #[serde(serialize_with = "secret::serialize")]
    pub data_source_name: SecretString,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enable_collectors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disable_collectors: Vec<String>,
    pub lock_wait_timeout: u32,
    #[serde(skip_serializing_if = "is_false")]
    pub log_slow_filter: bool,
}

#[derive(Debug, Serialize)]
pub struct PostgresArguments {
    #[serde(serialize_with = "secret::list")]
    pub data_source_names: Vec<SecretString>,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_settings_metrics: bool,
    pub autodiscovery: AutodiscoveryArguments,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_default_metrics: bool,
    pub custom_queries_config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutodiscoveryArguments {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub database_allowlist: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub database_denylist: Vec<String>,
}
