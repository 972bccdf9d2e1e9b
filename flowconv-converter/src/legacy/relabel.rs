use serde::{Deserialize, Serialize};

/// Relabel action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Replace,
    Keep,
    Drop,
    KeepEqual,
    DropEqual,
    HashMod,
    LabelMap,
    LabelDrop,
    LabelKeep,
    Lowercase,
    Uppercase,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Replace => "replace",
            Action::Keep => "keep",
            Action::Drop => "drop",
            Action::KeepEqual => "keepequal",
            Action::DropEqual => "dropequal",
            Action::HashMod => "hashmod",
            Action::LabelMap => "labelmap",
            Action::LabelDrop => "labeldrop",
            Action::LabelKeep => "labelkeep",
            Action::Lowercase => "lowercase",
            Action::Uppercase => "uppercase",
        }
    }

    /// Actions that write a label and therefore need `target_label`.
    pub fn needs_target_label(&self) -> bool {
        matches!(
            self,
            Action::Replace
                | Action::HashMod
                | Action::Lowercase
                | Action::Uppercase
                | Action::KeepEqual
                | Action::DropEqual
        )
    }
}

/// One relabel rule. `Default` is the rule template every synthesized rule
/// starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelabelConfig {
    pub source_labels: Vec<String>,
    pub separator: String,
    pub regex: String,
    pub modulus: u64,
    pub target_label: String,
    pub replacement: String,
    pub action: Action,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            source_labels: Vec::new(),
            separator: ";".to_string(),
            regex: "(.*)".to_string(),
            modulus: 0,
            target_label: String::new(),
            replacement: "$1".to_string(),
            action: Action::Replace,
        }
    }
}

impl RelabelConfig {
    /// A `replace` rule writing a fixed value into `target_label`.
    pub fn replace(target_label: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
            replacement: replacement.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let rule: RelabelConfig = serde_json::from_str(r#"{"target_label": "env"}"#).unwrap();
        assert_eq!(rule.separator, ";");
        assert_eq!(rule.regex, "(.*)");
        assert_eq!(rule.replacement, "$1");
        assert_eq!(rule.action, Action::Replace);
        assert_eq!(rule.target_label, "env");
    }

    #[test]
    fn test_action_names() {
        let action: Action = serde_json::from_str(r#""labeldrop""#).unwrap();
        assert_eq!(action, Action::LabelDrop);
        assert_eq!(action.as_str(), "labeldrop");
        assert!(!action.needs_target_label());
        assert!(Action::HashMod.needs_target_label());
    }

    #[test]
    fn test_replace_template() {
        let rule = RelabelConfig::replace("job", "integrations/agent");
        assert_eq!(rule.target_label, "job");
        assert_eq!(rule.replacement, "integrations/agent");
        assert_eq!(rule.regex, RelabelConfig::default().regex);
    }
}
