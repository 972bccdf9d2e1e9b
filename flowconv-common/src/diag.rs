//! Conversion diagnostics.
//!
//! Diagnostics are the expected-outcome channel of a conversion: anything the
//! converter could not reproduce is reported here instead of returned as an
//! error. A `Critical` entry never stops sibling conversions from running.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; the output is equivalent or the difference is cosmetic.
    Info,
    /// The output does not reproduce the input's runtime behavior.
    Critical,
}

impl Severity {
    /// Get the severity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.severity, self.summary)?;
        for line in self.detail.lines() {
            write!(f, "\n    {}", line)?;
        }
        Ok(())
    }
}

/// Ordered accumulator of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic without detail.
    pub fn add(&mut self, severity: Severity, summary: impl Into<String>) {
        self.add_with_detail(severity, summary, String::new());
    }

    /// Add a diagnostic with a (possibly multi-line) detail.
    pub fn add_with_detail(
        &mut self,
        severity: Severity,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.0.push(Diagnostic {
            severity,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    /// Append every diagnostic of `other`, keeping its order.
    pub fn add_all(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Whether any diagnostic is `Critical`.
    pub fn has_critical(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Critical)
    }

    /// Number of diagnostics with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.0.iter().filter(|d| d.severity == severity).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Report a feature that is present in the input but cannot be converted.
    ///
    /// `message`, when non-empty, is appended after the feature name.
    pub fn add_unsupported(&mut self, severity: Severity, name: &str, message: &str) {
        if message.is_empty() {
            self.add(
                severity,
                format!("The converter does not support converting the provided {} config.", name),
            );
        } else {
            self.add(
                severity,
                format!(
                    "The converter does not support converting the provided {} config: {}",
                    name, message
                ),
            );
        }
    }

    /// Render a plain-text report, one diagnostic per entry.
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diag) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diag)?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_order() {
        let mut diags = Diagnostics::new();
        diags.add(Severity::Info, "first");
        diags.add(Severity::Critical, "second");
        diags.add_with_detail(Severity::Info, "third", "line");

        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, vec!["first", "second", "third"]);
        assert_eq!(diags.len(), 3);
        assert!(diags.has_critical());
        assert_eq!(diags.count(Severity::Info), 2);
    }

    #[test]
    fn test_add_all_is_associative() {
        let mk = |s: &str| {
            let mut d = Diagnostics::new();
            d.add(Severity::Info, s);
            d
        };

        let mut left = mk("a");
        let mut bc = mk("b");
        bc.add_all(mk("c"));
        left.add_all(bc);

        let mut right = mk("a");
        right.add_all(mk("b"));
        right.add_all(mk("c"));

        assert_eq!(left, right);
    }

    #[test]
    fn test_display_report() {
        let mut diags = Diagnostics::new();
        diags.add(Severity::Critical, "unsupported alerting config");
        diags.add_with_detail(Severity::Info, "scrape job", "discovery.consul.job1\nprometheus.scrape.job1");

        let report = diags.report();
        assert_eq!(
            report,
            "(Critical) unsupported alerting config\n(Info) scrape job\n    discovery.consul.job1\n    prometheus.scrape.job1"
        );
    }

    #[test]
    fn test_add_unsupported() {
        let mut diags = Diagnostics::new();
        diags.add_unsupported(Severity::Critical, "rule_files", "");
        diags.add_unsupported(Severity::Info, "global query_log_file", "not used at runtime.");

        let all: Vec<_> = diags.iter().collect();
        assert_eq!(
            all[0].summary,
            "The converter does not support converting the provided rule_files config."
        );
        assert_eq!(
            all[1].summary,
            "The converter does not support converting the provided global query_log_file config: not used at runtime."
        );
    }

    #[test]
    fn test_empty() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert!(!diags.has_critical());
        assert_eq!(diags.report(), "");
    }
}
