use flowconv_common::Diagnostics;

use super::http::validate_http_client_config;
use crate::legacy::SdConfig;

/// Validate one service discovery config.
///
/// Families embedding an HTTP client are checked through
/// [`validate_http_client_config`]; the others have nothing the converter
/// cannot reproduce.
pub fn validate_discovery(sd: &SdConfig) -> Diagnostics {
    match sd {
        SdConfig::Consul(_)
        | SdConfig::Docker(_)
        | SdConfig::Kubernetes(_)
        | SdConfig::Marathon(_)
        | SdConfig::Kuma(_)
        | SdConfig::Linode(_)
        | SdConfig::Http(_) => sd
            .http_client_config()
            .map(validate_http_client_config)
            .unwrap_or_default(),
        SdConfig::Static(_)
        | SdConfig::Dns(_)
        | SdConfig::File(_)
        | SdConfig::Gce(_)
        | SdConfig::Ionos(_)
        | SdConfig::Triton(_)
        | SdConfig::Openstack(_)
        | SdConfig::Nerve(_)
        | SdConfig::Serverset(_) => Diagnostics::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::discovery::{DnsSdConfig, KubernetesSdConfig};

    #[test]
    fn test_no_op_family() {
        assert!(validate_discovery(&SdConfig::Dns(DnsSdConfig::default())).is_empty());
    }

    #[test]
    fn test_http_family_checks_client() {
        let mut cfg = KubernetesSdConfig::default();
        cfg.http_client_config.bearer_token = Some("a".to_string());
        cfg.http_client_config.bearer_token_file = Some("/b".to_string());

        let diags = validate_discovery(&SdConfig::Kubernetes(cfg));
        assert!(diags.has_critical());
    }
}
