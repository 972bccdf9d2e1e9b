//! `discovery.relabel` and `prometheus.relabel` arguments.

use flowconv_common::Reference;
use serde::Serialize;

use super::TargetsExpr;
use crate::legacy::{Action, RelabelConfig};

/// One rendered relabel rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleArguments {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_labels: Vec<String>,
    pub separator: String,
    pub regex: String,
    #[serde(skip_serializing_if = "super::is_zero")]
    pub modulus: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_label: String,
    pub replacement: String,
    pub action: Action,
}

impl From<&RelabelConfig> for RuleArguments {
    fn from(rule: &RelabelConfig) -> Self {
        Self {
            source_labels: rule.source_labels.clone(),
            separator: rule.separator.clone(),
            regex: rule.regex.clone(),
            modulus: rule.modulus,
            target_label: rule.target_label.clone(),
            replacement: rule.replacement.clone(),
            action: rule.action,
        }
    }
}

pub fn rules(configs: &[RelabelConfig]) -> Vec<RuleArguments> {
    configs.iter().map(RuleArguments::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryRelabelArguments {
    pub targets: TargetsExpr,
    pub rule: Vec<RuleArguments>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrometheusRelabelArguments {
    pub forward_to: Vec<Reference>,
    pub rule: Vec<RuleArguments>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_omits_empty_fields() {
        let rule = RuleArguments::from(&RelabelConfig::replace("cluster", "prod"));
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "separator": ";",
                "regex": "(.*)",
                "target_label": "cluster",
                "replacement": "prod",
                "action": "replace",
            })
        );
    }
}
