use flowconv_common::{Diagnostics, Severity};
use regex::Regex;

use crate::legacy::{Action, RelabelConfig};

/// Check that every rule can be evaluated.
pub fn validate_relabel_configs(rules: &[RelabelConfig]) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for rule in rules {
        if let Err(e) = Regex::new(&format!("^(?s:{})$", rule.regex)) {
            diags.add(
                Severity::Critical,
                format!("invalid relabel regex {:?}: {}", rule.regex, e),
            );
        }

        if rule.action.needs_target_label() && rule.target_label.is_empty() {
            diags.add(
                Severity::Critical,
                format!(
                    "relabel configuration for {} action requires 'target_label' value",
                    rule.action.as_str()
                ),
            );
        }

        if rule.action == Action::HashMod && rule.modulus == 0 {
            diags.add(
                Severity::Critical,
                "relabel configuration for hashmod requires non-zero modulus",
            );
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_needs_target() {
        let diags = validate_relabel_configs(&[RelabelConfig::default()]);
        assert_eq!(diags.len(), 1);
        assert!(diags.iter().next().unwrap().summary.contains("replace action"));

        assert!(validate_relabel_configs(&[RelabelConfig::replace("env", "prod")]).is_empty());
    }

    #[test]
    fn test_invalid_regex_and_modulus() {
        let rule = RelabelConfig {
            regex: "(unclosed".to_string(),
            action: Action::HashMod,
            target_label: "shard".to_string(),
            ..Default::default()
        };

        let diags = validate_relabel_configs(&[rule]);
        assert_eq!(diags.count(Severity::Critical), 2);
    }

    #[test]
    fn test_keep_needs_no_target() {
        let rule = RelabelConfig {
            source_labels: vec!["__meta_consul_service".to_string()],
            regex: "web|api".to_string(),
            action: Action::Keep,
            ..Default::default()
        };
        assert!(validate_relabel_configs(&[rule]).is_empty());
    }
}
