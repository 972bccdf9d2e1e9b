//! Integration tests for the convert and serve commands.

use std::fs;
use std::path::PathBuf;

use flowconv::commands::{build_host, convert_options, convert_path, write_conversion};
use flowconv::{CommandError, ToolConfig};
use tempfile::TempDir;

/// Helper to write a legacy config into a temp dir.
fn legacy_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("agent.json5");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_convert_writes_output_and_report() {
    let dir = TempDir::new().unwrap();
    let input = legacy_file(
        &dir,
        r#"{
            // scrape one consul service
            scrape_configs: [{
                job_name: "job1",
                consul_sd_configs: [{ server: "consul.example.com:8500" }],
            }],
        }"#,
    );
    let output = dir.path().join("agent.flow");
    let report = dir.path().join("report.txt");

    let options = convert_options(&ToolConfig::default(), None);
    let conversion = convert_path(&input, &options).unwrap();
    write_conversion(&conversion, &options, Some(&output), Some(&report)).unwrap();

    let rendered = fs::read_to_string(&output).unwrap();
    assert!(rendered.starts_with("discovery.consul \"job1\" {\n"));
    assert!(rendered.contains("prometheus.scrape \"job1\" {\n"));

    let report = fs::read_to_string(&report).unwrap();
    assert!(report.contains("Converted scrape_configs job_name \"job1\" into..."));
}

#[test]
fn test_critical_diagnostics_block_output() {
    let dir = TempDir::new().unwrap();
    let input = legacy_file(&dir, r#"{ rule_files: ["rules.yml"] }"#);
    let output = dir.path().join("agent.flow");
    let report = dir.path().join("report.txt");

    let options = convert_options(&ToolConfig::default(), None);
    let conversion = convert_path(&input, &options).unwrap();
    let result = write_conversion(&conversion, &options, Some(&output), Some(&report));

    assert!(matches!(result, Err(CommandError::Critical(1))));
    assert!(!output.exists());
    assert!(
        fs::read_to_string(&report)
            .unwrap()
            .contains("rule_files")
    );

    // Bypassing keeps the best-effort output.
    let mut config = ToolConfig::default();
    config.conversion.bypass_errors = true;
    let options = convert_options(&config, None);
    write_conversion(&conversion, &options, Some(&output), Some(&report)).unwrap();
    assert!(output.exists());
}

#[test]
fn test_missing_input() {
    let options = convert_options(&ToolConfig::default(), None);
    let result = convert_path(&PathBuf::from("/nonexistent/agent.json5"), &options);
    assert!(matches!(result, Err(CommandError::Load(_))));
}

#[test]
fn test_agent_integration_becomes_host_component() {
    let dir = TempDir::new().unwrap();
    let input = legacy_file(
        &dir,
        r#"{
            integrations: {
                prometheus_remote_write: [{ url: "http://mimir/api/v1/push" }],
                agent: { enabled: true },
            },
        }"#,
    );

    let options = convert_options(&ToolConfig::default(), None);
    let conversion = convert_path(&input, &options).unwrap();
    assert!(
        !conversion.diagnostics.has_critical(),
        "{}",
        conversion.diagnostics.report()
    );

    let host = build_host(&conversion.file, "127.0.0.1:12345").unwrap();
    let ids = host.component_ids();
    assert_eq!(ids, vec!["prometheus.exporter.self.integrations_agent"]);
    assert!(conversion.file.len() > 1);

    let exports = host.exports(&ids[0]).unwrap();
    assert_eq!(exports["targets"][0]["job"], "integrations/agent");
}
