//! `discovery.*` component arguments and the shared HTTP client block.

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;

use super::{is_false, secret};
use crate::legacy::duration;

/// HTTP client settings, flattened into every network-based component.
#[derive(Debug, Default, Serialize)]
pub struct HttpClientArguments {
    pub basic_auth: Option<BasicAuthArguments>,
    pub authorization: Option<AuthorizationArguments>,
    pub oauth2: Option<OAuth2Arguments>,
    #[serde(serialize_with = "secret::option")]
    pub bearer_token: Option<SecretString>,
    pub bearer_token_file: Option<String>,
    pub proxy_url: Option<String>,
    pub no_proxy: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub proxy_from_environment: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub proxy_connect_header: BTreeMap<String, Vec<String>>,
    pub tls_config: Option<TlsArguments>,
    pub follow_redirects: bool,
    pub enable_http2: bool,
}

#[derive(Debug, Serialize)]
pub struct BasicAuthArguments {
    pub username: String,
    #[serde(serialize_with = "secret::option")]
    pub password: Option<SecretString>,
    pub password_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthorizationArguments {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(serialize_with = "secret::option")]
    pub credentials: Option<SecretString>,
    pub credentials_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OAuth2Arguments {
    pub client_id: String,
    #[serde(serialize_with = "secret::option")]
    pub client_secret: Option<SecretString>,
    pub client_secret_file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    pub token_url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoint_params: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct TlsArguments {
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub server_name: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub insecure_skip_verify: bool,
    pub min_version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConsulArguments {
    pub server: String,
    pub path_prefix: Option<String>,
    #[serde(serialize_with = "secret::option")]
    pub token: Option<SecretString>,
    pub datacenter: Option<String>,
    pub namespace: Option<String>,
    pub partition: Option<String>,
    pub tag_separator: String,
    pub scheme: String,
    pub allow_stale: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub node_meta: BTreeMap<String, String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct DockerFilterArguments {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DockerArguments {
    pub host: String,
    pub port: u16,
    pub host_networking_host: String,
    #[serde(rename = "filter", skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<DockerFilterArguments>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceArguments {
    pub own_namespace: bool,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectorArguments {
    pub role: String,
    pub label: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KubernetesArguments {
    pub api_server: Option<String>,
    pub role: String,
    pub kubeconfig_file: Option<String>,
    pub namespaces: Option<NamespaceArguments>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<SelectorArguments>,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Serialize)]
pub struct MarathonArguments {
    pub servers: Vec<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(serialize_with = "secret::option")]
    pub auth_token: Option<SecretString>,
    pub auth_token_file: Option<String>,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Serialize)]
pub struct KumaArguments {
    pub server: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(with = "duration::required")]
    pub fetch_timeout: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Serialize)]
pub struct LinodeArguments {
    pub region: Option<String>,
    pub port: u16,
    pub tag_separator: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Serialize)]
pub struct HttpArguments {
    pub url: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(flatten)]
    pub http_client_config: HttpClientArguments,
}

#[derive(Debug, Clone, Serialize)]
pub struct DnsArguments {
    pub names: Vec<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    #[serde(rename = "type")]
    pub record_type: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileArguments {
    pub files: Vec<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct GceArguments {
    pub project: String,
    pub zone: String,
    pub filter: Option<String>,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub port: u16,
    pub tag_separator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IonosArguments {
    pub datacenter_id: String,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct TritonArguments {
    pub account: String,
    pub role: String,
    pub dns_suffix: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    pub port: u16,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub version: u32,
    pub tls_config: Option<TlsArguments>,
}

#[derive(Debug, Serialize)]
pub struct OpenstackArguments {
    pub role: String,
    pub region: String,
    pub identity_endpoint: Option<String>,
    pub username: Option<String>,
    pub userid: Option<String>,
    #[serde(serialize_with = "secret::option")]
    pub password: Option<SecretString>,
    pub domain_name: Option<String>,
    pub domain_id: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub application_credential_name: Option<String>,
    pub application_credential_id: Option<String>,
    #[serde(serialize_with = "secret::option")]
    pub application_credential_secret: Option<SecretString>,
    #[serde(skip_serializing_if = "is_false")]
    pub all_tenants: bool,
    #[serde(with = "duration::required")]
    pub refresh_interval: Duration,
    pub port: u16,
    pub availability: String,
    pub tls_config: Option<TlsArguments>,
}

/// Shared by the nerve and serverset families.
#[derive(Debug, Clone, Serialize)]
pub struct ZookeeperArguments {
    pub servers: Vec<String>,
    pub paths: Vec<String>,
    #[serde(with = "duration::required")]
    pub timeout: Duration,
}
