//! Top-level sections of the legacy config with no component counterpart.

use flowconv_common::{Diagnostics, Severity};

use crate::legacy::{
    AlertingConfig, DEFAULT_EVALUATION_INTERVAL, GlobalConfig, RemoteReadConfig, StorageConfig,
    TracingConfig,
};

pub fn validate_global(global: &GlobalConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();

    if global.evaluation_interval != DEFAULT_EVALUATION_INTERVAL {
        diags.add_unsupported(
            Severity::Info,
            "global evaluation_interval",
            "rules are not evaluated by the generated components.",
        );
    }
    if global.query_log_file.is_some() {
        diags.add_unsupported(Severity::Info, "global query_log_file", "");
    }

    diags
}

pub fn validate_alerting(alerting: Option<&AlertingConfig>) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if alerting.is_some() {
        diags.add_unsupported(Severity::Critical, "alerting", "");
    }
    diags
}

pub fn validate_rule_files(rule_files: &[String]) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if !rule_files.is_empty() {
        diags.add_unsupported(Severity::Critical, "rule_files", "");
    }
    diags
}

pub fn validate_storage(storage: &StorageConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if !storage.is_default() {
        diags.add_unsupported(Severity::Critical, "storage", "");
    }
    diags
}

pub fn validate_tracing(tracing: &TracingConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if !tracing.is_default() {
        diags.add_unsupported(Severity::Critical, "tracing", "");
    }
    diags
}

/// One diagnostic regardless of the number of entries.
pub fn validate_remote_read(remote_read: &[RemoteReadConfig]) -> Diagnostics {
    let mut diags = Diagnostics::new();
    if !remote_read.is_empty() {
        diags.add_unsupported(Severity::Critical, "remote_read", "");
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_are_silent() {
        assert!(validate_global(&GlobalConfig::default()).is_empty());
        assert!(validate_alerting(None).is_empty());
        assert!(validate_rule_files(&[]).is_empty());
        assert!(validate_storage(&StorageConfig::default()).is_empty());
        assert!(validate_tracing(&TracingConfig::default()).is_empty());
        assert!(validate_remote_read(&[]).is_empty());
    }

    #[test]
    fn test_cosmetic_settings_are_info() {
        let global = GlobalConfig {
            evaluation_interval: Duration::from_secs(30),
            query_log_file: Some("/tmp/q.log".to_string()),
            ..Default::default()
        };
        let diags = validate_global(&global);
        assert_eq!(diags.count(Severity::Info), 2);
        assert!(!diags.has_critical());
    }

    #[test]
    fn test_remote_read_single_diagnostic() {
        let entries = vec![RemoteReadConfig::default(), RemoteReadConfig::default()];
        let diags = validate_remote_read(&entries);
        assert_eq!(diags.len(), 1);
        assert!(diags.has_critical());
    }
}
