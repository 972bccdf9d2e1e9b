use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Labels starting with this prefix are internal bookkeeping.
pub const RESERVED_PREFIX: &str = "__";
pub const ADDRESS_LABEL: &str = "__address__";
pub const METRICS_PATH_LABEL: &str = "__metrics_path__";
pub const INSTANCE_LABEL: &str = "instance";
pub const JOB_LABEL: &str = "job";

/// A label set describing one scrape endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(BTreeMap<String, String>);

impl Target {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label (builder pattern).
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn address(&self) -> Option<&str> {
        self.get(ADDRESS_LABEL)
    }

    pub fn instance(&self) -> Option<&str> {
        self.get(INSTANCE_LABEL)
    }

    pub fn job(&self) -> Option<&str> {
        self.get(JOB_LABEL)
    }

    /// Labels without the reserved `__` prefix.
    pub fn filtered(&self) -> BTreeMap<&str, &str> {
        self.0
            .iter()
            .filter(|(k, _)| !k.starts_with(RESERVED_PREFIX))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Target {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_drops_reserved() {
        let target = Target::new()
            .with_label(ADDRESS_LABEL, "localhost:9100")
            .with_label(METRICS_PATH_LABEL, "/metrics")
            .with_label(JOB_LABEL, "integrations/node_exporter")
            .with_label(INSTANCE_LABEL, "host-a");

        let filtered = target.filtered();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.get("job"), Some(&"integrations/node_exporter"));
        assert!(!filtered.contains_key(ADDRESS_LABEL));
        assert_eq!(target.address(), Some("localhost:9100"));
        assert_eq!(target.instance(), Some("host-a"));
    }

    #[test]
    fn test_keys_unique_and_order_independent() {
        let a: Target = [("b", "2"), ("a", "1"), ("a", "3")].into_iter().collect();
        let b = Target::new().with_label("a", "3").with_label("b", "2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_serializes_as_map() {
        let target = Target::new().with_label("__address__", "a:1");
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, r#"{"__address__":"a:1"}"#);
    }
}
