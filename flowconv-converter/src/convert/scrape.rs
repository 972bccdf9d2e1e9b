//! Scrape job converter.

use std::collections::BTreeMap;

use flowconv_common::{Reference, Target, label_with_index, sanitize_identifier};

use super::describe;
use super::discovery::append_discovery;
use super::http::to_http_client_arguments;
use crate::build::{Block, PrometheusBlocks};
use crate::component::TargetsExpr;
use crate::component::relabel::{DiscoveryRelabelArguments, PrometheusRelabelArguments, rules};
use crate::component::scrape::ScrapeArguments;
use crate::error::{ConvertError, Result};
use crate::legacy::{GlobalConfig, SdConfig, ScrapeConfig};

/// Convert one scrape job.
///
/// Emits one discovery block per non-static discovery config (labelled
/// `<job>`, `<job>_1`, ... per family), a `discovery.relabel` block when
/// the job has relabel rules, the `prometheus.scrape` block, and a
/// `prometheus.relabel` block when the job has metric relabel rules.
///
/// `extra_targets` come before the discovered targets.
pub fn append_scrape_config(
    pb: &mut PrometheusBlocks,
    job: &ScrapeConfig,
    global: &GlobalConfig,
    forward_to: &[Reference],
    extra_targets: Vec<TargetsExpr>,
) -> Result<()> {
    let label = sanitize_identifier(&job.job_name)
        .map_err(|e| ConvertError::label(format!("scrape job {:?}", job.job_name), e))?;
    let summary = format!("Converted scrape_configs job_name {:?} into...", job.job_name);

    let mut references = Vec::new();
    let mut literal = Vec::new();
    for expr in extra_targets {
        split_targets(expr, &mut references, &mut literal);
    }
    let mut family_counts: BTreeMap<&'static str, usize> = BTreeMap::new();

    for sd in job.service_discovery_configs() {
        let sd_label = if matches!(sd, SdConfig::Static(_)) {
            label.clone()
        } else {
            let count = family_counts.entry(sd.family()).or_default();
            let sd_label = label_with_index(*count, &label);
            *count += 1;
            sd_label
        };

        if let Some(exports) = append_discovery(pb, &sd_label, &sd, &summary)? {
            split_targets(exports.targets, &mut references, &mut literal);
        }
    }

    let mut targets = TargetsExpr::combine(references, literal);

    if !job.relabel_configs.is_empty() {
        let block = describe(
            Block::new(
                &["discovery", "relabel"],
                label.clone(),
                &DiscoveryRelabelArguments {
                    targets,
                    rule: rules(&job.relabel_configs),
                },
            )?,
            &summary,
        );
        targets = TargetsExpr::Ref(block.reference("output"));
        pb.append_discovery_relabel_block(block);
    }

    let mut scrape_forward_to = forward_to.to_vec();
    if !job.metric_relabel_configs.is_empty() {
        let block = describe(
            Block::new(
                &["prometheus", "relabel"],
                label.clone(),
                &PrometheusRelabelArguments {
                    forward_to: scrape_forward_to,
                    rule: rules(&job.metric_relabel_configs),
                },
            )?,
            &summary,
        );
        scrape_forward_to = vec![block.reference("receiver")];
        pb.append_relabel_block(block);
    }

    let args = ScrapeArguments {
        targets,
        forward_to: scrape_forward_to,
        job_name: job.job_name.clone(),
        honor_labels: job.honor_labels,
        honor_timestamps: job.honor_timestamps,
        params: job.params.clone(),
        scrape_interval: job.scrape_interval.unwrap_or(global.scrape_interval),
        scrape_timeout: job.scrape_timeout.unwrap_or(global.scrape_timeout),
        metrics_path: job.metrics_path.clone(),
        scheme: job.scheme.clone(),
        body_size_limit: job.body_size_limit,
        sample_limit: job.sample_limit,
        target_limit: job.target_limit,
        label_limit: job.label_limit,
        label_name_length_limit: job.label_name_length_limit,
        label_value_length_limit: job.label_value_length_limit,
        http_client_config: to_http_client_arguments(&job.http_client_config),
    };
    pb.append_scrape_block(describe(
        Block::new(&["prometheus", "scrape"], label, &args)?,
        &summary,
    ));

    Ok(())
}

fn split_targets(expr: TargetsExpr, references: &mut Vec<Reference>, literal: &mut Vec<Target>) {
    match expr {
        TargetsExpr::Literal(targets) => literal.extend(targets),
        TargetsExpr::Ref(reference) => references.push(reference),
        TargetsExpr::Concat(parts) => {
            for part in parts {
                split_targets(part, references, literal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::File;
    use flowconv_common::parse_config;

    fn convert_job(json5: &str) -> File {
        let job: ScrapeConfig = parse_config(json5).unwrap();
        let rw = Reference::new(["prometheus", "remote_write"], "default", "receiver");
        let mut pb = PrometheusBlocks::new();
        append_scrape_config(&mut pb, &job, &GlobalConfig::default(), &[rw], Vec::new()).unwrap();

        let mut file = File::new();
        pb.append_to_file(&mut file);
        file
    }

    fn ids(file: &File) -> Vec<String> {
        file.blocks().iter().map(Block::id).collect()
    }

    #[test]
    fn test_family_counters() {
        let file = convert_job(
            r#"{
                job_name: "web-app",
                dns_sd_configs: [{ names: ["a.example"] }, { names: ["b.example"] }],
                consul_sd_configs: [{ server: "consul:8500" }],
            }"#,
        );

        assert_eq!(
            ids(&file),
            vec![
                "discovery.consul.web_app",
                "discovery.dns.web_app",
                "discovery.dns.web_app_1",
                "prometheus.scrape.web_app",
            ]
        );

        let scrape = file.find("prometheus.scrape.web_app").unwrap();
        let targets = &scrape.body()["targets"];
        assert_eq!(targets["$call"], "concat");
        assert_eq!(targets["$args"][0]["$expr"], "discovery.consul.web_app.targets");
        assert_eq!(targets["$args"][2]["$expr"], "discovery.dns.web_app_1.targets");
        assert_eq!(scrape.body()["scrape_interval"], "1m");
    }

    #[test]
    fn test_relabel_chain() {
        let file = convert_job(
            r#"{
                job_name: "node",
                scrape_interval: "15s",
                static_configs: [{ targets: ["localhost:9100"] }],
                relabel_configs: [{ target_label: "env", replacement: "prod" }],
                metric_relabel_configs: [{ source_labels: ["__name__"], regex: "go_.*", action: "drop" }],
            }"#,
        );

        assert_eq!(
            ids(&file),
            vec![
                "discovery.relabel.node",
                "prometheus.scrape.node",
                "prometheus.relabel.node",
            ]
        );

        let relabel = file.find("discovery.relabel.node").unwrap();
        assert_eq!(relabel.body()["targets"][0]["__address__"], "localhost:9100");

        let scrape = file.find("prometheus.scrape.node").unwrap();
        assert_eq!(scrape.body()["targets"]["$expr"], "discovery.relabel.node.output");
        assert_eq!(scrape.body()["forward_to"][0]["$expr"], "prometheus.relabel.node.receiver");
        assert_eq!(scrape.body()["scrape_interval"], "15s");

        let metric_relabel = file.find("prometheus.relabel.node").unwrap();
        assert_eq!(
            metric_relabel.body()["forward_to"][0]["$expr"],
            "prometheus.remote_write.default.receiver"
        );
    }

    #[test]
    fn test_empty_job_name_is_error() {
        let job = ScrapeConfig::default();
        let mut pb = PrometheusBlocks::new();
        let err = append_scrape_config(&mut pb, &job, &GlobalConfig::default(), &[], Vec::new());
        assert!(matches!(err, Err(ConvertError::Label { .. })));
        assert!(pb.is_empty());
    }
}
