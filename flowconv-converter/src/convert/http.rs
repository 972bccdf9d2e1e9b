//! Field converters for the shared HTTP client settings.

use secrecy::SecretString;

use crate::component::discovery::{
    AuthorizationArguments, BasicAuthArguments, HttpClientArguments, OAuth2Arguments,
    TlsArguments,
};
use crate::component::secret;
use crate::legacy::HttpClientConfig;
use crate::legacy::http::TlsConfig;

pub fn to_http_client_arguments(cfg: &HttpClientConfig) -> HttpClientArguments {
    HttpClientArguments {
        basic_auth: cfg.basic_auth.as_ref().map(|b| BasicAuthArguments {
            username: b.username.clone(),
            password: secret::wrap(&b.password),
            password_file: b.password_file.clone(),
        }),
        authorization: cfg.authorization.as_ref().map(|a| AuthorizationArguments {
            kind: a.kind.clone(),
            credentials: secret::wrap(&a.credentials),
            credentials_file: a.credentials_file.clone(),
        }),
        oauth2: cfg.oauth2.as_ref().map(|o| OAuth2Arguments {
            client_id: o.client_id.clone(),
            client_secret: secret::wrap(&o.client_secret),
            client_secret_file: o.client_secret_file.clone(),
            scopes: o.scopes.clone(),
            token_url: o.token_url.clone(),
            endpoint_params: o.endpoint_params.clone(),
        }),
        bearer_token: cfg
            .bearer_token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.clone())),
        bearer_token_file: cfg.bearer_token_file.clone().filter(|f| !f.is_empty()),
        proxy_url: cfg.proxy_url.clone(),
        no_proxy: cfg.no_proxy.clone(),
        proxy_from_environment: cfg.proxy_from_environment,
        proxy_connect_header: cfg.proxy_connect_header.clone(),
        tls_config: to_tls_arguments(&cfg.tls_config),
        follow_redirects: cfg.follow_redirects,
        enable_http2: cfg.enable_http2,
    }
}

/// `None` when every TLS setting has its default value.
pub fn to_tls_arguments(cfg: &TlsConfig) -> Option<TlsArguments> {
    if cfg.is_default() {
        return None;
    }

    Some(TlsArguments {
        ca_file: cfg.ca_file.clone(),
        cert_file: cfg.cert_file.clone(),
        key_file: cfg.key_file.clone(),
        server_name: cfg.server_name.clone(),
        insecure_skip_verify: cfg.insecure_skip_verify,
        min_version: cfg.min_version.clone(),
    })
}
