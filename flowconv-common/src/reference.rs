//! Symbolic references between components.
//!
//! A component's exports are addressed as `<name path>.<label>.<field>`, for
//! example `discovery.consul.job1.targets`. Converters wire components together
//! with these references before anything is running; a consuming runtime
//! resolves them against the exports it has published.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Object key marking a raw expression in serialized arguments.
pub const EXPR_KEY: &str = "$expr";
/// Object keys marking a function call in serialized arguments.
pub const CALL_KEY: &str = "$call";
pub const ARGS_KEY: &str = "$args";

/// Typed reference to one exported field of a component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reference {
    name: Vec<String>,
    label: String,
    field: String,
}

impl Reference {
    pub fn new<I, S>(name: I, label: impl Into<String>, field: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into_iter().map(Into::into).collect(),
            label: label.into(),
            field: field.into(),
        }
    }

    pub fn name(&self) -> &[String] {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// `<name path>.<label>`, the address of the exporting component.
    pub fn component_id(&self) -> String {
        format!("{}.{}", self.name.join("."), self.label)
    }

    /// The full expression string.
    pub fn expr(&self) -> String {
        format!("{}.{}", self.component_id(), self.field)
    }

    /// Look the referenced field up in a table of published exports.
    pub fn resolve<'a>(&self, table: &'a ExportTable) -> Result<&'a Value> {
        table
            .get(&self.component_id())
            .and_then(|exports| exports.get(&self.field))
            .ok_or_else(|| Error::Reference(format!("{} is not exported", self.expr())))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr())
    }
}

impl FromStr for Reference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(Error::Reference(format!(
                "expected <name>.<label>.<field>, got {:?}",
                s
            )));
        }

        let field = parts.pop().unwrap_or_default();
        let label = parts.pop().unwrap_or_default();
        Ok(Self::new(parts, label, field))
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(EXPR_KEY, &self.expr())?;
        map.end()
    }
}

/// Build the serialized form of a function call expression.
pub fn call(function: &str, args: Vec<Value>) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(CALL_KEY.to_string(), Value::String(function.to_string()));
    map.insert(ARGS_KEY.to_string(), Value::Array(args));
    Value::Object(map)
}

/// Exports published by running components, keyed by component id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable(BTreeMap<String, Value>);

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the exports of a component.
    pub fn publish<T: Serialize>(&mut self, component_id: impl Into<String>, exports: &T) -> Result<()> {
        let value = serde_json::to_value(exports)?;
        self.0.insert(component_id.into(), value);
        Ok(())
    }

    pub fn get(&self, component_id: &str) -> Option<&Value> {
        self.0.get(component_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expr() {
        let r = Reference::new(["discovery", "consul"], "job1", "targets");
        assert_eq!(r.expr(), "discovery.consul.job1.targets");
        assert_eq!(r.component_id(), "discovery.consul.job1");
        assert_eq!(r.to_string(), r.expr());
    }

    #[test]
    fn test_parse() {
        let r: Reference = "prometheus.remote_write.default.receiver".parse().unwrap();
        assert_eq!(r.name(), ["prometheus", "remote_write"]);
        assert_eq!(r.label(), "default");
        assert_eq!(r.field(), "receiver");

        let r: Reference = "otelcol.exporter.prometheus.traces_spanmetrics.input".parse().unwrap();
        assert_eq!(r.name(), ["otelcol", "exporter", "prometheus"]);
        assert_eq!(r.label(), "traces_spanmetrics");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("a.b".parse::<Reference>().is_err());
        assert!("a..b.c".parse::<Reference>().is_err());
        assert!("".parse::<Reference>().is_err());
    }

    #[test]
    fn test_resolve() {
        let mut table = ExportTable::new();
        table
            .publish("discovery.consul.job1", &json!({ "targets": [{ "__address__": "a:1" }] }))
            .unwrap();

        let r = Reference::new(["discovery", "consul"], "job1", "targets");
        let value = r.resolve(&table).unwrap();
        assert_eq!(value, &json!([{ "__address__": "a:1" }]));

        let missing = Reference::new(["discovery", "consul"], "job2", "targets");
        assert!(missing.resolve(&table).is_err());

        let wrong_field = Reference::new(["discovery", "consul"], "job1", "output");
        assert!(wrong_field.resolve(&table).is_err());
    }

    #[test]
    fn test_serialize_marker() {
        let r = Reference::new(["discovery", "relabel"], "job1", "output");
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value, json!({ "$expr": "discovery.relabel.job1.output" }));
    }

    #[test]
    fn test_call_marker() {
        let value = call("concat", vec![json!(1)]);
        assert_eq!(value, json!({ "$call": "concat", "$args": [1] }));
    }
}
