use std::collections::BTreeMap;

use serde::Deserialize;

/// HTTP client settings embedded in every network-based config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub basic_auth: Option<BasicAuth>,
    pub authorization: Option<Authorization>,
    pub oauth2: Option<OAuth2>,
    pub bearer_token: Option<String>,
    pub bearer_token_file: Option<String>,
    pub tls_config: TlsConfig,
    pub proxy_url: Option<String>,
    pub no_proxy: Option<String>,
    pub proxy_from_environment: bool,
    pub proxy_connect_header: BTreeMap<String, Vec<String>>,
    pub follow_redirects: bool,
    pub enable_http2: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            basic_auth: None,
            authorization: None,
            oauth2: None,
            bearer_token: None,
            bearer_token_file: None,
            tls_config: TlsConfig::default(),
            proxy_url: None,
            no_proxy: None,
            proxy_from_environment: false,
            proxy_connect_header: BTreeMap::new(),
            follow_redirects: true,
            enable_http2: true,
        }
    }
}

impl HttpClientConfig {
    /// Names of the configured authentication mechanisms, in a fixed order.
    pub fn auth_methods(&self) -> Vec<&'static str> {
        let mut methods = Vec::new();
        if self.basic_auth.is_some() {
            methods.push("basic_auth");
        }
        if self.authorization.is_some() {
            methods.push("authorization");
        }
        if self.oauth2.is_some() {
            methods.push("oauth2");
        }
        if self.bearer_token.as_deref().is_some_and(|t| !t.is_empty()) {
            methods.push("bearer_token");
        }
        if self.bearer_token_file.as_deref().is_some_and(|t| !t.is_empty()) {
            methods.push("bearer_token_file");
        }
        methods
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
    pub password_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Authorization {
    #[serde(rename = "type")]
    pub kind: String,
    pub credentials: Option<String>,
    pub credentials_file: Option<String>,
}

impl Default for Authorization {
    fn default() -> Self {
        Self {
            kind: "Bearer".to_string(),
            credentials: None,
            credentials_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OAuth2 {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub client_secret_file: Option<String>,
    pub scopes: Vec<String>,
    pub token_url: String,
    pub endpoint_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub server_name: Option<String>,
    pub insecure_skip_verify: bool,
    pub min_version: Option<String>,
}

impl TlsConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
