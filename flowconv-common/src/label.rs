//! Identifier helpers for component labels.

use crate::error::{Error, Result};

/// Turn an arbitrary name into a valid component label.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, and a leading digit is
/// prefixed with `_`. Empty input has no valid label.
pub fn sanitize_identifier(input: &str) -> Result<String> {
    if input.is_empty() {
        return Err(Error::Identifier {
            input: input.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }

    let mut result = String::with_capacity(input.len() + 1);
    if input.starts_with(|c: char| c.is_ascii_digit()) {
        result.push('_');
    }

    for c in input.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            result.push('_');
        }
    }

    Ok(result)
}

/// Whether `input` is already a valid label.
pub fn is_valid_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Disambiguate the `index`-th use of `label` within one scope.
///
/// The first use keeps the label unchanged.
pub fn label_with_index(index: usize, label: &str) -> String {
    if index == 0 {
        label.to_string()
    } else {
        format!("{}_{}", label, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("job1").unwrap(), "job1");
        assert_eq!(sanitize_identifier("my-job.name").unwrap(), "my_job_name");
        assert_eq!(
            sanitize_identifier("integrations/node_exporter").unwrap(),
            "integrations_node_exporter"
        );
        assert_eq!(sanitize_identifier("1st").unwrap(), "_1st");
        assert_eq!(sanitize_identifier("a  b").unwrap(), "a__b");
    }

    #[test]
    fn test_sanitize_empty_fails() {
        assert!(sanitize_identifier("").is_err());
    }

    #[test]
    fn test_sanitized_is_valid() {
        for input in ["job1", "-", "9", "ü-name", "a.b/c"] {
            let label = sanitize_identifier(input).unwrap();
            assert!(is_valid_identifier(&label), "{} -> {}", input, label);
        }
        assert!(!is_valid_identifier("1a"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_label_with_index() {
        assert_eq!(label_with_index(0, "job1"), "job1");
        assert_eq!(label_with_index(1, "job1"), "job1_1");
        assert_eq!(label_with_index(12, "job1"), "job1_12");
    }
}
