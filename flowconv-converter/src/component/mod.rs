//! Typed arguments and exports of the emitted components.
//!
//! Every component kind has one `Serialize` arguments struct. Field order is
//! the attribute order of the rendered block.

pub mod discovery;
pub mod exporter;
pub mod otelcol;
pub mod relabel;
pub mod remote_write;
pub mod scrape;

use flowconv_common::reference::call;
use flowconv_common::{Reference, Target};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Exports of components that produce targets.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryExports {
    pub targets: TargetsExpr,
}

impl DiscoveryExports {
    pub fn new(targets: TargetsExpr) -> Self {
        Self { targets }
    }

    pub fn from_reference(reference: Reference) -> Self {
        Self {
            targets: TargetsExpr::Ref(reference),
        }
    }
}

/// Exports of components that accept samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverExports {
    pub receiver: Reference,
}

impl ReceiverExports {
    pub fn new(receiver: Reference) -> Self {
        Self { receiver }
    }
}

/// An expression evaluating to a list of targets.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetsExpr {
    Literal(Vec<Target>),
    Ref(Reference),
    Concat(Vec<TargetsExpr>),
}

impl Default for TargetsExpr {
    fn default() -> Self {
        TargetsExpr::Literal(Vec::new())
    }
}

impl TargetsExpr {
    /// Combine discovery references and literal targets.
    ///
    /// References come first, in order, then the literal targets if any.
    /// A single part is used as is; several are wrapped in `concat`.
    pub fn combine(references: Vec<Reference>, literal: Vec<Target>) -> Self {
        let mut parts: Vec<TargetsExpr> = references.into_iter().map(TargetsExpr::Ref).collect();
        if !literal.is_empty() {
            parts.push(TargetsExpr::Literal(literal));
        }

        match parts.len() {
            0 => TargetsExpr::default(),
            1 => parts.remove(0),
            _ => TargetsExpr::Concat(parts),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            TargetsExpr::Literal(targets) => {
                serde_json::to_value(targets).unwrap_or(Value::Array(Vec::new()))
            }
            TargetsExpr::Ref(reference) => serde_json::to_value(reference).unwrap_or(Value::Null),
            TargetsExpr::Concat(parts) => {
                call("concat", parts.iter().map(TargetsExpr::to_value).collect())
            }
        }
    }
}

impl Serialize for TargetsExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Serializers exposing wrapped secrets in the generated configuration.
pub(crate) mod secret {
    use secrecy::{ExposeSecret, SecretString};
    use serde::ser::SerializeSeq;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.expose_secret())
    }

    pub fn option<S: Serializer>(
        value: &Option<SecretString>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(secret) => serializer.serialize_str(secret.expose_secret()),
            None => serializer.serialize_none(),
        }
    }

    pub fn list<S: Serializer>(value: &[SecretString], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(value.len()))?;
        for secret in value {
            seq.serialize_element(secret.expose_secret())?;
        }
        seq.end()
    }

    /// Wrap a plain optional string.
    pub fn wrap(value: &Option<String>) -> Option<SecretString> {
        value.as_ref().map(|s| SecretString::from(s.clone()))
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}
