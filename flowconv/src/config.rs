//! Settings of the flowconv tool itself.

use std::path::Path;

use flowconv_common::LoggingConfig;
use flowconv_converter::Platform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Conversion settings.
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Settings of the `serve` command.
    #[serde(default)]
    pub serve: ServeConfig,
}

/// Conversion settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Platform whose exporter defaults are used (default: the host).
    #[serde(default)]
    pub platform: Option<Platform>,

    /// Write the output even when Critical diagnostics were reported.
    #[serde(default)]
    pub bypass_errors: bool,

    /// Where to write the diagnostics report (default: stderr).
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Component host settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Address to listen on (default: "127.0.0.1:12345").
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:12345".to_string()
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl ToolConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ToolConfig = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        if let Some(path) = &self.conversion.report_path {
            if path.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "report_path must not be empty".to_string(),
                ));
            }
        }

        if self.serve.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid listen address: {}",
                self.serve.listen
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowconv_common::LogFormat;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_config() {
        let config = ToolConfig::parse("{}").unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.conversion.platform, None);
        assert!(!config.conversion.bypass_errors);
        assert_eq!(config.serve.listen, "127.0.0.1:12345");
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            // JSON5 allows comments
            logging: { level: "debug", format: "json" },
            conversion: {
                platform: "darwin",
                bypass_errors: true,
                report_path: "/tmp/report.txt",
            },
            serve: { listen: "0.0.0.0:9000" },
        }"#;

        let config = ToolConfig::parse(json).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.conversion.platform, Some(Platform::Darwin));
        assert!(config.conversion.bypass_errors);
        assert_eq!(
            config.conversion.report_path.as_deref(),
            Some("/tmp/report.txt")
        );
        assert_eq!(config.serve.listen, "0.0.0.0:9000");
    }

    #[test]
    fn test_validate_invalid_level() {
        let result = ToolConfig::parse(r#"{ logging: { level: "loud" } }"#);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid log level")
        );
    }

    #[test]
    fn test_validate_invalid_listen() {
        let result = ToolConfig::parse(r#"{ serve: { listen: "nowhere" } }"#);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid listen address")
        );
    }

    #[test]
    fn test_validate_empty_report_path() {
        let result = ToolConfig::parse(r#"{ conversion: { report_path: " " } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_platform() {
        let result = ToolConfig::parse(r#"{ conversion: { platform: "plan9" } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ conversion: {{ platform: 'linux' }} }}").unwrap();

        let config = ToolConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.conversion.platform, Some(Platform::Linux));

        let missing = ToolConfig::load_from_file("/nonexistent/flowconv.json5");
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
