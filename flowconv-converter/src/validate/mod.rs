//! Validation of the legacy config.
//!
//! Validators are pure functions returning [`Diagnostics`]. They never fail
//! and never stop early: every section is checked even when an earlier one
//! produced a Critical diagnostic.

pub mod discovery;
pub mod global;
pub mod http;
pub mod integrations;
pub mod relabel;
pub mod traces;

use flowconv_common::{Diagnostics, Severity};
use tracing::debug;

use crate::legacy::{LegacyConfig, RemoteWriteConfig, ScrapeConfig};

pub use discovery::validate_discovery;
pub use global::{
    validate_alerting, validate_global, validate_remote_read, validate_rule_files,
    validate_storage, validate_tracing,
};
pub use http::validate_http_client_config;
pub use integrations::validate_integrations;
pub use relabel::validate_relabel_configs;
pub use traces::validate_traces;

/// Validate the whole legacy config.
///
/// Order: global, alerting, rule files, scrape configs, storage, tracing,
/// remote write, remote read, integrations, traces.
pub fn validate(cfg: &LegacyConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();

    diags.add_all(validate_global(&cfg.global));
    diags.add_all(validate_alerting(cfg.alerting.as_ref()));
    diags.add_all(validate_rule_files(&cfg.rule_files));
    diags.add_all(validate_scrape_configs(&cfg.scrape_configs));
    diags.add_all(validate_storage(&cfg.storage));
    diags.add_all(validate_tracing(&cfg.tracing));
    diags.add_all(validate_remote_write(&cfg.remote_write));
    diags.add_all(validate_remote_read(&cfg.remote_read));

    if let Some(integrations) = &cfg.integrations {
        diags.add_all(validate_integrations(integrations));
    }
    if let Some(traces) = &cfg.traces {
        diags.add_all(validate_traces(traces, !cfg.remote_write.is_empty()));
    }

    debug!(
        diagnostics = diags.len(),
        critical = diags.count(Severity::Critical),
        "Validated legacy config"
    );
    diags
}

pub fn validate_scrape_configs(jobs: &[ScrapeConfig]) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for job in jobs {
        diags.add_all(validate_scrape_config(job));
    }
    diags
}

/// Validate one scrape job and every discovery config it embeds.
pub fn validate_scrape_config(job: &ScrapeConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();

    if job.job_name.is_empty() {
        diags.add(Severity::Critical, "scrape config is missing a job_name");
    }

    diags.add_all(validate_http_client_config(&job.http_client_config));
    diags.add_all(validate_relabel_configs(&job.relabel_configs));
    diags.add_all(validate_relabel_configs(&job.metric_relabel_configs));

    for sd in job.service_discovery_configs() {
        diags.add_all(validate_discovery(&sd));
    }

    diags
}

pub fn validate_remote_write(remote_write: &[RemoteWriteConfig]) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for rw in remote_write {
        diags.add_all(validate_http_client_config(&rw.http_client_config));
        diags.add_all(validate_relabel_configs(&rw.write_relabel_configs));
        if rw.azuread.is_some() {
            diags.add_unsupported(Severity::Critical, "remote_write azuread", "");
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowconv_common::parse_config;

    #[test]
    fn test_validate_does_not_short_circuit() {
        let cfg: LegacyConfig = parse_config(
            r#"{
                rule_files: ["rules.yml"],
                alerting: { alertmanagers: [] },
                storage: { exemplars: { max_exemplars: 10 } },
                tracing: { endpoint: "tempo:4317" },
                remote_read: [{ url: "http://a/read" }, { url: "http://b/read" }],
            }"#,
        )
        .unwrap();

        let diags = validate(&cfg);
        assert_eq!(diags.count(Severity::Critical), 5);

        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert!(summaries[0].contains("alerting"));
        assert!(summaries[1].contains("rule_files"));
        assert!(summaries[2].contains("storage"));
        assert!(summaries[3].contains("tracing"));
        assert!(summaries[4].contains("remote_read"));
    }

    #[test]
    fn test_scrape_job_checks_discovery_clients() {
        let cfg: LegacyConfig = parse_config(
            r#"{
                scrape_configs: [{
                    job_name: "k8s",
                    kubernetes_sd_configs: [{
                        role: "pod",
                        bearer_token: "a",
                        oauth2: { client_id: "id", token_url: "http://idp/token" },
                    }],
                }],
            }"#,
        )
        .unwrap();

        let diags = validate(&cfg);
        assert_eq!(diags.len(), 1);
        assert!(diags.has_critical());
    }

    #[test]
    fn test_remote_write_azuread() {
        let cfg: LegacyConfig = parse_config(
            r#"{ remote_write: [{ url: "http://x/push", azuread: { cloud: "AzurePublic" } }] }"#,
        )
        .unwrap();
        assert!(validate(&cfg).has_critical());
    }

    #[test]
    fn test_remote_write_token_conflict() {
        let cfg: LegacyConfig = parse_config(
            r#"{
                remote_write: [{
                    url: "http://x/push",
                    bearer_token: "t",
                    bearer_token_file: "/var/run/token",
                }],
            }"#,
        )
        .unwrap();

        let diags = validate(&cfg);
        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.severity, Severity::Critical);
        assert!(diag.summary.contains(
            "at most one of basic_auth, authorization, oauth2, bearer_token & bearer_token_file must be configured"
        ));
    }
}
