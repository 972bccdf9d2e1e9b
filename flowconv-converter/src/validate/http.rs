//! HTTP client settings shared by network-based discovery and remote write.

use flowconv_common::{Diagnostics, Severity};

use crate::legacy::HttpClientConfig;

/// Reject ambiguous authentication and proxy settings.
///
/// Each violated rule yields one Critical diagnostic.
pub fn validate_http_client_config(cfg: &HttpClientConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();

    if cfg.auth_methods().len() > 1 {
        diags.add(
            Severity::Critical,
            "at most one of basic_auth, authorization, oauth2, bearer_token & bearer_token_file must be configured",
        );
    }

    if let Some(basic) = &cfg.basic_auth {
        if is_set(&basic.password) && is_set(&basic.password_file) {
            diags.add(
                Severity::Critical,
                "at most one of basic_auth password & password_file must be configured",
            );
        }
    }

    if let Some(auth) = &cfg.authorization {
        if is_set(&auth.credentials) && is_set(&auth.credentials_file) {
            diags.add(
                Severity::Critical,
                "at most one of authorization credentials & credentials_file must be configured",
            );
        }
        if auth.kind.eq_ignore_ascii_case("basic") {
            diags.add(
                Severity::Critical,
                "authorization type cannot be set to \"basic\", use \"basic_auth\" instead",
            );
        }
    }

    if let Some(oauth2) = &cfg.oauth2 {
        if oauth2.client_id.is_empty() {
            diags.add(Severity::Critical, "oauth2 client_id must be configured");
        }
        if is_set(&oauth2.client_secret) && is_set(&oauth2.client_secret_file) {
            diags.add(
                Severity::Critical,
                "at most one of oauth2 client_secret & client_secret_file must be configured",
            );
        }
        if oauth2.token_url.is_empty() {
            diags.add(Severity::Critical, "oauth2 token_url must be configured");
        }
    }

    let has_proxy_url = is_set(&cfg.proxy_url);
    if !cfg.proxy_connect_header.is_empty() && !has_proxy_url && !cfg.proxy_from_environment {
        diags.add(
            Severity::Critical,
            "if proxy_connect_header is configured, proxy_url or proxy_from_environment must also be configured",
        );
    }
    if cfg.proxy_from_environment && has_proxy_url {
        diags.add(
            Severity::Critical,
            "if proxy_from_environment is configured, proxy_url must not be configured",
        );
    }
    if cfg.proxy_from_environment && is_set(&cfg.no_proxy) {
        diags.add(
            Severity::Critical,
            "if proxy_from_environment is configured, no_proxy must not be configured",
        );
    }
    if is_set(&cfg.no_proxy) && !has_proxy_url {
        diags.add(
            Severity::Critical,
            "if no_proxy is configured, proxy_url must also be configured",
        );
    }

    diags
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
