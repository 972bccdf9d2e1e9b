//! Integration converters.
//!
//! Each enabled, scraped and supported integration becomes a
//! `prometheus.exporter.*` block scraped by its own job
//! `integrations/<name>`, writing to `prometheus.remote_write "integrations"`.

use flowconv_common::target::{INSTANCE_LABEL, JOB_LABEL};
use flowconv_common::sanitize_identifier;
use secrecy::SecretString;
use serde::Serialize;
use tracing::debug;

use super::describe;
use super::remote_write::append_remote_write;
use super::scrape::append_scrape_config;
use crate::build::{Block, PrometheusBlocks};
use crate::component::DiscoveryExports;
use crate::component::exporter::*;
use crate::component::secret;
use crate::defaults::PlatformDefaults;
use crate::error::{ConvertError, Result};
use crate::legacy::integrations::{
    CommonConfig, KnownIntegration, MysqldExporterConfig, NodeExporterConfig,
    PostgresExporterConfig, RedisExporterConfig,
};
use crate::legacy::{GlobalConfig, IntegrationsConfig, RelabelConfig, ScrapeConfig};

pub const INTEGRATIONS_REMOTE_WRITE_LABEL: &str = "integrations";

/// Convert every integration that can be converted.
///
/// Integrations reported by validation (disabled, unknown, not scraped,
/// undecodable, or without a remote write) are skipped here.
pub fn append_integrations(
    pb: &mut PrometheusBlocks,
    cfg: &IntegrationsConfig,
    global: &GlobalConfig,
    defaults: &PlatformDefaults,
) -> Result<()> {
    let Some(remote_write) = append_remote_write(
        pb,
        INTEGRATIONS_REMOTE_WRITE_LABEL,
        &cfg.prometheus_remote_write,
        &global.external_labels,
    )?
    else {
        debug!("No integrations remote_write configured, skipping integrations");
        return Ok(());
    };
    let forward_to = vec![remote_write.receiver];

    for (name, fragment) in &cfg.configs {
        let Some(Ok(integration)) = KnownIntegration::decode(name, fragment) else {
            continue;
        };
        let common = integration.common();
        if !common.enabled || !cfg.is_scraped(common) {
            continue;
        }

        let exports = append_exporter(pb, name, &integration, defaults)?;
        let job = integration_scrape_config(name, common, cfg);
        append_scrape_config(pb, &job, global, &forward_to, vec![exports.targets])?;
        debug!(integration = %name, "Converted integration");
    }

    Ok(())
}

/// Convert an integration into its `prometheus.exporter.*` block.
pub fn append_exporter(
    pb: &mut PrometheusBlocks,
    name: &str,
    integration: &KnownIntegration,
    defaults: &PlatformDefaults,
) -> Result<DiscoveryExports> {
    let key = integration.common().instance.as_deref().unwrap_or(name);
    let label = sanitize_identifier(&format!("integrations/{}", key))
        .map_err(|e| ConvertError::label(format!("integration {:?}", name), e))?;
    let exporter = integration.exporter_name();

    let block = match integration {
        KnownIntegration::Agent(_) => exporter_block(exporter, &label, &SelfArguments::default())?,
        KnownIntegration::NodeExporter(cfg) => {
            exporter_block(exporter, &label, &to_unix_arguments(cfg, defaults))?
        }
        KnownIntegration::RedisExporter(cfg) => {
            exporter_block(exporter, &label, &to_redis_arguments(cfg))?
        }
        KnownIntegration::MysqldExporter(cfg) => {
            exporter_block(exporter, &label, &to_mysql_arguments(cfg))?
        }
        KnownIntegration::PostgresExporter(cfg) => {
            exporter_block(exporter, &label, &to_postgres_arguments(cfg))?
        }
    };

    let block = describe(block, &format!("Converted integration {:?} into...", name));
    let exports = DiscoveryExports::from_reference(block.reference("targets"));
    pb.append_discovery_block(block);
    Ok(exports)
}

fn exporter_block<T: Serialize>(exporter: &str, label: &str, args: &T) -> Result<Block> {
    Block::new(&["prometheus", "exporter", exporter], label, args)
}

/// The scrape job reading one integration's exporter.
///
/// Relabel rules: the integration's own rules, then the instance rule when
/// an instance key is set, then the job rule unless a rule already writes
/// `job`. The shared `http_tls_config` applies to every job.
pub fn integration_scrape_config(
    name: &str,
    common: &CommonConfig,
    cfg: &IntegrationsConfig,
) -> ScrapeConfig {
    let job_name = format!("integrations/{}", name);

    let mut relabel_configs = common.relabel_configs.clone();
    if let Some(instance) = &common.instance {
        relabel_configs.push(RelabelConfig::replace(INSTANCE_LABEL, instance.clone()));
    }
    if !relabel_configs.iter().any(|r| r.target_label == JOB_LABEL) {
        relabel_configs.push(RelabelConfig::replace(JOB_LABEL, job_name.clone()));
    }

    let mut job = ScrapeConfig {
        job_name,
        scrape_interval: common.scrape_interval.or(cfg.scrape_interval),
        scrape_timeout: common.scrape_timeout.or(cfg.scrape_timeout),
        relabel_configs,
        metric_relabel_configs: common.metric_relabel_configs.clone(),
        ..Default::default()
    };
    job.http_client_config.tls_config = cfg.http_tls_config.clone();
    job
}

fn to_unix_arguments(cfg: &NodeExporterConfig, defaults: &PlatformDefaults) -> UnixArguments {
    UnixArguments {
        include_exporter_metrics: cfg.include_exporter_metrics,
        procfs_path: cfg.procfs_path.clone(),
        sysfs_path: cfg.sysfs_path.clone(),
        rootfs_path: cfg.rootfs_path.clone(),
        enable_collectors: cfg.enable_collectors.clone(),
        disable_collectors: cfg.disable_collectors.clone(),
        set_collectors: cfg.set_collectors.clone(),
        filesystem: FilesystemArguments {
            fs_types_exclude: cfg
                .filesystem_fs_types_exclude
                .clone()
                .unwrap_or_else(|| defaults.filesystem_fs_types_exclude.clone()),
            mount_points_exclude: cfg
                .filesystem_mount_points_exclude
                .clone()
                .unwrap_or_else(|| defaults.filesystem_mount_points_exclude.clone()),
            mount_timeout: cfg.filesystem_mount_timeout,
        },
        netclass: NetclassArguments {
            ignored_devices: cfg
                .netclass_ignored_devices
                .clone()
                .unwrap_or_else(|| defaults.netclass_ignored_devices.clone()),
        },
        supervisord: SupervisordArguments {
            url: cfg
                .supervisord_url
                .clone()
                .unwrap_or_else(|| defaults.supervisord_url.clone()),
        },
        textfile: TextfileArguments {
            directory: cfg.textfile_directory.clone(),
        },
    }
}

fn to_redis_arguments(cfg: &RedisExporterConfig) -> RedisArguments {
    RedisArguments {
        redis_addr: cfg.redis_addr.clone(),
        redis_user: cfg.redis_user.clone(),
        redis_password: secret::wrap(&cfg.redis_password),
        redis_password_file: cfg.redis_password_file.clone(),
        namespace: cfg.namespace.clone(),
        check_keys: cfg.check_keys.clone(),
        include_exporter_metrics: cfg.include_exporter_metrics,
    }
}

fn to_mysql_arguments(cfg: &MysqldExporterConfig) -> MysqlArguments {
    MysqlArguments {
        data_source_name: SecretString::from(cfg.data_source_name.clone()),
        enable_collectors: cfg.enable_collectors.clone(),
        disable_collectors: cfg.disable_collectors.clone(),
        lock_wait_timeout: cfg.lock_wait_timeout,
        log_slow_filter: cfg.log_slow_filter,
    }
}

fn to_postgres_arguments(cfg: &PostgresExporterConfig) -> PostgresArguments {
    PostgresArguments {
        data_source_names: cfg
            .data_source_names
            .iter()
            .map(|dsn| SecretString::from(dsn.clone()))
            .collect(),
        disable_settings_metrics: cfg.disable_settings_metrics,
        autodiscovery: AutodiscoveryArguments {
            enabled: cfg.autodiscover_databases,
            database_allowlist: cfg.include_databases.clone(),
            database_denylist: cfg.exclude_databases.clone(),
        },
        disable_default_metrics: cfg.disable_default_metrics,
        custom_queries_config_path: cfg.query_path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::File;
    use crate::defaults::Platform;
    use crate::legacy::Action;
    use serde_json::json;

    fn integrations(value: serde_json::Value) -> IntegrationsConfig {
        serde_json::from_value(value).unwrap()
    }

    fn convert(cfg: &IntegrationsConfig) -> File {
        let mut pb = PrometheusBlocks::new();
        append_integrations(
            &mut pb,
            cfg,
            &GlobalConfig::default(),
            &PlatformDefaults::for_platform(Platform::Darwin),
        )
        .unwrap();
        let mut file = File::new();
        pb.append_to_file(&mut file);
        file
    }

    #[test]
    fn test_node_exporter_shape() {
        let cfg = integrations(json!({
            "prometheus_remote_write": [{ "url": "http://mimir/api/v1/push" }],
            "node_exporter": { "enabled": true, "instance": "host-a" },
        }));

        let file = convert(&cfg);
        let ids: Vec<_> = file.blocks().iter().map(Block::id).collect();
        assert_eq!(
            ids,
            vec![
                "prometheus.exporter.unix.integrations_host_a",
                "discovery.relabel.integrations_node_exporter",
                "prometheus.scrape.integrations_node_exporter",
                "prometheus.remote_write.integrations",
            ]
        );

        let exporter = file.find("prometheus.exporter.unix.integrations_host_a").unwrap();
        assert_eq!(exporter.body()["filesystem"]["fs_types_exclude"], "^(autofs|devfs)$");
        assert_eq!(exporter.body()["supervisord"]["url"], "http://localhost:9001/RPC2");

        let relabel = file.find("discovery.relabel.integrations_node_exporter").unwrap();
        assert_eq!(
            relabel.body()["targets"]["$expr"],
            "prometheus.exporter.unix.integrations_host_a.targets"
        );
        let rules = relabel.body()["rule"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["target_label"], "instance");
        assert_eq!(rules[0]["replacement"], "host-a");
        assert_eq!(rules[1]["target_label"], "job");
        assert_eq!(rules[1]["replacement"], "integrations/node_exporter");

        let scrape = file.find("prometheus.scrape.integrations_node_exporter").unwrap();
        assert_eq!(scrape.body()["job_name"], "integrations/node_exporter");
        assert_eq!(
            scrape.body()["forward_to"][0]["$expr"],
            "prometheus.remote_write.integrations.receiver"
        );
    }

    #[test]
    fn test_shared_tls_config_reaches_scrape_jobs() {
        let cfg = integrations(json!({
            "http_tls_config": { "ca_file": "/etc/ca.pem", "insecure_skip_verify": true },
            "prometheus_remote_write": [{ "url": "http://mimir/api/v1/push" }],
            "agent": { "enabled": true },
        }));

        let file = convert(&cfg);
        let scrape = file.find("prometheus.scrape.integrations_agent").unwrap();
        assert_eq!(scrape.body()["tls_config"]["ca_file"], "/etc/ca.pem");
        assert_eq!(scrape.body()["tls_config"]["insecure_skip_verify"], true);

        let rendered = file.render();
        assert!(rendered.contains("ca_file = \"/etc/ca.pem\""));
        assert!(rendered.contains("insecure_skip_verify = true"));
    }

    #[test]
    fn test_user_job_rule_wins() {
        let common = CommonConfig {
            enabled: true,
            relabel_configs: vec![RelabelConfig {
                target_label: "job".to_string(),
                replacement: "custom".to_string(),
                action: Action::Replace,
                ..Default::default()
            }],
            ..Default::default()
        };

        let job = integration_scrape_config("agent", &common, &IntegrationsConfig::default());
        assert_eq!(job.relabel_configs.len(), 1);
        assert_eq!(job.relabel_configs[0].replacement, "custom");
    }

    #[test]
    fn test_skipped_integrations() {
        let cfg = integrations(json!({
            "prometheus_remote_write": [{ "url": "http://mimir/api/v1/push" }],
            "agent": { "enabled": false },
            "redis_exporter": { "enabled": true, "scrape_integration": false },
            "apache_http": { "enabled": true },
        }));

        let file = convert(&cfg);
        let ids: Vec<_> = file.blocks().iter().map(Block::id).collect();
        assert_eq!(ids, vec!["prometheus.remote_write.integrations"]);
    }

    #[test]
    fn test_no_remote_write_emits_nothing() {
        let cfg = integrations(json!({ "agent": { "enabled": true } }));
        assert!(convert(&cfg).is_empty());
    }

    #[test]
    fn test_mysql_secret_rendered() {
        let cfg = integrations(json!({
            "prometheus_remote_write": [{ "url": "http://mimir/api/v1/push" }],
            "mysqld_exporter": { "enabled": true, "data_source_name": "root@(db:3306)/" },
        }));

        let file = convert(&cfg);
        let exporter = file.find("prometheus.exporter.mysql.integrations_mysqld_exporter").unwrap();
        assert_eq!(exporter.body()["data_source_name"], "root@(db:3306)/");
        assert_eq!(exporter.body()["lock_wait_timeout"], 2);
    }
}
