use flowconv_common::{Diagnostics, Severity};

use super::http::validate_http_client_config;
use super::relabel::validate_relabel_configs;
use crate::legacy::IntegrationsConfig;
use crate::legacy::integrations::KnownIntegration;

/// Report integrations the converter skips or cannot reproduce.
pub fn validate_integrations(cfg: &IntegrationsConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let mut any_enabled = false;

    for (name, fragment) in &cfg.configs {
        let common = match cfg.common(name) {
            Some(Ok(common)) => common,
            Some(Err(e)) => {
                diags.add(
                    Severity::Critical,
                    format!("failed to decode the {} integration: {}", name, e),
                );
                continue;
            }
            None => continue,
        };

        if !common.enabled {
            diags.add(
                Severity::Info,
                format!(
                    "disabled integrations do nothing and are not included in the output: {}.",
                    name
                ),
            );
            continue;
        }
        any_enabled = true;

        match KnownIntegration::decode(name, fragment) {
            None => {
                diags.add(
                    Severity::Critical,
                    format!(
                        "The converter does not support converting the provided {} integration.",
                        name
                    ),
                );
                continue;
            }
            Some(Err(e)) => {
                diags.add(
                    Severity::Critical,
                    format!("failed to decode the {} integration: {}", name, e),
                );
                continue;
            }
            Some(Ok(_)) => {}
        }

        if !cfg.is_scraped(&common) {
            diags.add(
                Severity::Critical,
                format!(
                    "The converter does not support handling integrations which are not being scraped: {}.",
                    name
                ),
            );
        }

        if common.wal_truncate_frequency.is_some() {
            diags.add_unsupported(
                Severity::Info,
                &format!("{} wal_truncate_frequency", name),
                "",
            );
        }

        diags.add_all(validate_relabel_configs(&common.relabel_configs));
        diags.add_all(validate_relabel_configs(&common.metric_relabel_configs));
    }

    if any_enabled && cfg.prometheus_remote_write.is_empty() {
        diags.add(
            Severity::Critical,
            "The converter does not support handling integrations which are not connected to a remote_write.",
        );
    }

    for rw in &cfg.prometheus_remote_write {
        diags.add_all(validate_http_client_config(&rw.http_client_config));
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> IntegrationsConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_disabled_is_info() {
        let cfg = config(json!({
            "node_exporter": { "enabled": false },
        }));

        let diags = validate_integrations(&cfg);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().summary,
            "disabled integrations do nothing and are not included in the output: node_exporter."
        );
        assert!(!diags.has_critical());
    }

    #[test]
    fn test_unknown_unscraped_and_no_remote_write() {
        let cfg = config(json!({
            "apache_http": { "enabled": true },
            "agent": { "enabled": true, "scrape_integration": false },
        }));

        let summaries: Vec<_> = validate_integrations(&cfg)
            .iter()
            .map(|d| d.summary.clone())
            .collect();
        assert_eq!(
            summaries,
            vec![
                "The converter does not support handling integrations which are not being scraped: agent.",
                "The converter does not support converting the provided apache_http integration.",
                "The converter does not support handling integrations which are not connected to a remote_write.",
            ]
        );
    }

    #[test]
    fn test_wal_truncate_frequency_is_info() {
        let cfg = config(json!({
            "prometheus_remote_write": [{ "url": "http://mimir/push" }],
            "agent": { "enabled": true, "wal_truncate_frequency": "1m" },
        }));

        let diags = validate_integrations(&cfg);
        assert_eq!(diags.len(), 1);
        assert!(!diags.has_critical());
        assert_eq!(
            diags.iter().next().unwrap().summary,
            "The converter does not support converting the provided agent wal_truncate_frequency config."
        );
    }

    #[test]
    fn test_supported_integration_is_clean() {
        let cfg = config(json!({
            "prometheus_remote_write": [{ "url": "http://mimir/push" }],
            "redis_exporter": { "enabled": true, "redis_addr": "localhost:6379" },
        }));
        assert!(validate_integrations(&cfg).is_empty());
    }
}
