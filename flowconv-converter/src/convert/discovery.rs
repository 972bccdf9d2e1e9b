//! Service discovery converters.

use flowconv_common::Target;
use flowconv_common::target::ADDRESS_LABEL;
use serde::Serialize;

use super::http::{to_http_client_arguments, to_tls_arguments};
use super::describe;
use crate::build::{Block, PrometheusBlocks};
use crate::component::discovery::*;
use crate::component::secret;
use crate::component::{DiscoveryExports, TargetsExpr};
use crate::error::Result;
use crate::legacy::SdConfig;
use crate::legacy::discovery::{StaticConfig, ZookeeperSdConfig};

/// Convert one discovery config into a `discovery.<family>` block.
///
/// Static configs produce literal targets and no block.
pub fn append_discovery(
    pb: &mut PrometheusBlocks,
    label: &str,
    sd: &SdConfig,
    summary: &str,
) -> Result<Option<DiscoveryExports>> {
    let block = match sd {
        SdConfig::Static(cfg) => {
            return Ok(Some(DiscoveryExports::new(TargetsExpr::Literal(
                static_targets(cfg),
            ))));
        }
        SdConfig::Consul(cfg) => discovery_block(sd, label, &ConsulArguments {
            server: cfg.server.clone(),
            path_prefix: cfg.path_prefix.clone(),
            token: secret::wrap(&cfg.token),
            datacenter: cfg.datacenter.clone(),
            namespace: cfg.namespace.clone(),
            partition: cfg.partition.clone(),
            tag_separator: cfg.tag_separator.clone(),
            scheme: cfg.scheme.clone(),
            allow_stale: cfg.allow_stale,
            services: cfg.services.clone(),
            tags: cfg.tags.clone(),
            node_meta: cfg.node_meta.clone(),
            refresh_interval: cfg.refresh_interval,
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Docker(cfg) => discovery_block(sd, label, &DockerArguments {
            host: cfg.host.clone(),
            port: cfg.port,
            host_networking_host: cfg.host_networking_host.clone(),
            filters: cfg
                .filters
                .iter()
                .map(|f| DockerFilterArguments {
                    name: f.name.clone(),
                    values: f.values.clone(),
                })
                .collect(),
            refresh_interval: cfg.refresh_interval,
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Kubernetes(cfg) => discovery_block(sd, label, &KubernetesArguments {
            api_server: cfg.api_server.clone(),
            role: cfg.role.clone(),
            kubeconfig_file: cfg.kubeconfig_file.clone(),
            namespaces: cfg.namespaces.as_ref().map(|n| NamespaceArguments {
                own_namespace: n.own_namespace,
                names: n.names.clone(),
            }),
            selectors: cfg
                .selectors
                .iter()
                .map(|s| SelectorArguments {
                    role: s.role.clone(),
                    label: s.label.clone(),
                    field: s.field.clone(),
                })
                .collect(),
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Marathon(cfg) => discovery_block(sd, label, &MarathonArguments {
            servers: cfg.servers.clone(),
            refresh_interval: cfg.refresh_interval,
            auth_token: secret::wrap(&cfg.auth_token),
            auth_token_file: cfg.auth_token_file.clone(),
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Kuma(cfg) => discovery_block(sd, label, &KumaArguments {
            server: cfg.server.clone(),
            refresh_interval: cfg.refresh_interval,
            fetch_timeout: cfg.fetch_timeout,
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Linode(cfg) => discovery_block(sd, label, &LinodeArguments {
            region: cfg.region.clone(),
            port: cfg.port,
            tag_separator: cfg.tag_separator.clone(),
            refresh_interval: cfg.refresh_interval,
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Http(cfg) => discovery_block(sd, label, &HttpArguments {
            url: cfg.url.clone(),
            refresh_interval: cfg.refresh_interval,
            http_client_config: to_http_client_arguments(&cfg.http_client_config),
        })?,
        SdConfig::Dns(cfg) => discovery_block(sd, label, &DnsArguments {
            names: cfg.names.clone(),
            refresh_interval: cfg.refresh_interval,
            record_type: cfg.record_type.clone(),
            port: cfg.port,
        })?,
        SdConfig::File(cfg) => discovery_block(sd, label, &FileArguments {
            files: cfg.files.clone(),
            refresh_interval: cfg.refresh_interval,
        })?,
        SdConfig::Gce(cfg) => discovery_block(sd, label, &GceArguments {
            project: cfg.project.clone(),
            zone: cfg.zone.clone(),
            filter: cfg.filter.clone(),
            refresh_interval: cfg.refresh_interval,
            port: cfg.port,
            tag_separator: cfg.tag_separator.clone(),
        })?,
        SdConfig::Ionos(cfg) => discovery_block(sd, label, &IonosArguments {
            datacenter_id: cfg.datacenter_id.clone(),
            refresh_interval: cfg.refresh_interval,
            port: cfg.port,
        })?,
        SdConfig::Triton(cfg) => discovery_block(sd, label, &TritonArguments {
            account: cfg.account.clone(),
            role: cfg.role.clone(),
            dns_suffix: cfg.dns_suffix.clone(),
            endpoint: cfg.endpoint.clone(),
            groups: cfg.groups.clone(),
            port: cfg.port,
            refresh_interval: cfg.refresh_interval,
            version: cfg.version,
            tls_config: to_tls_arguments(&cfg.tls_config),
        })?,
        SdConfig::Openstack(cfg) => discovery_block(sd, label, &OpenstackArguments {
            role: cfg.role.clone(),
            region: cfg.region.clone(),
            identity_endpoint: cfg.identity_endpoint.clone(),
            username: cfg.username.clone(),
            userid: cfg.userid.clone(),
            password: secret::wrap(&cfg.password),
            domain_name: cfg.domain_name.clone(),
            domain_id: cfg.domain_id.clone(),
            project_name: cfg.project_name.clone(),
            project_id: cfg.project_id.clone(),
            application_credential_name: cfg.application_credential_name.clone(),
            application_credential_id: cfg.application_credential_id.clone(),
            application_credential_secret: secret::wrap(&cfg.application_credential_secret),
            all_tenants: cfg.all_tenants,
            refresh_interval: cfg.refresh_interval,
            port: cfg.port,
            availability: cfg.availability.clone(),
            tls_config: to_tls_arguments(&cfg.tls_config),
        })?,
        SdConfig::Nerve(cfg) | SdConfig::Serverset(cfg) => {
            discovery_block(sd, label, &zookeeper_arguments(cfg))?
        }
    };

    let block = describe(block, summary);
    let exports = DiscoveryExports::from_reference(block.reference("targets"));
    pb.append_discovery_block(block);
    Ok(Some(exports))
}

fn discovery_block<T: Serialize>(sd: &SdConfig, label: &str, args: &T) -> Result<Block> {
    Block::new(&["discovery", sd.family()], label, args)
}

fn zookeeper_arguments(cfg: &ZookeeperSdConfig) -> ZookeeperArguments {
    ZookeeperArguments {
        servers: cfg.servers.clone(),
        paths: cfg.paths.clone(),
        timeout: cfg.timeout,
    }
}

/// One target per address, each carrying the group's labels.
pub fn static_targets(cfg: &StaticConfig) -> Vec<Target> {
    cfg.targets
        .iter()
        .map(|address| {
            let mut target: Target = cfg.labels.iter().collect();
            target.insert(ADDRESS_LABEL, address.clone());
            target
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::File;
    use crate::legacy::discovery::{ConsulSdConfig, DnsSdConfig};
    use std::collections::BTreeMap;

    #[test]
    fn test_static_has_no_block() {
        let mut pb = PrometheusBlocks::new();
        let cfg = StaticConfig {
            targets: vec!["localhost:9090".to_string(), "localhost:9100".to_string()],
            labels: BTreeMap::from([("env".to_string(), "dev".to_string())]),
        };

        let exports = append_discovery(&mut pb, "job", &SdConfig::Static(cfg), "s")
            .unwrap()
            .unwrap();
        assert!(pb.is_empty());

        match exports.targets {
            TargetsExpr::Literal(targets) => {
                assert_eq!(targets.len(), 2);
                assert_eq!(targets[1].address(), Some("localhost:9100"));
                assert_eq!(targets[1].get("env"), Some("dev"));
            }
            other => panic!("expected literal targets, got {:?}", other),
        }
    }

    #[test]
    fn test_consul_block_and_exports() {
        let mut pb = PrometheusBlocks::new();
        let cfg = ConsulSdConfig {
            server: "consul.example.com:8500".to_string(),
            ..Default::default()
        };

        let exports = append_discovery(&mut pb, "job1", &SdConfig::Consul(cfg), "summary")
            .unwrap()
            .unwrap();
        assert_eq!(
            exports.targets,
            TargetsExpr::Ref(flowconv_common::Reference::new(["discovery", "consul"], "job1", "targets"))
        );

        let mut file = File::new();
        pb.append_to_file(&mut file);
        let block = file.find("discovery.consul.job1").unwrap();
        assert_eq!(block.body()["server"], "consul.example.com:8500");
        assert_eq!(block.body()["refresh_interval"], "30s");
        assert_eq!(block.detail(), "A discovery.consul.job1 component");
    }

    #[test]
    fn test_dns_block_name() {
        let mut pb = PrometheusBlocks::new();
        let cfg = DnsSdConfig {
            names: vec!["_prometheus._tcp.example.com".to_string()],
            ..Default::default()
        };
        append_discovery(&mut pb, "job_1", &SdConfig::Dns(cfg), "s").unwrap();
        assert_eq!(pb.stages().next().unwrap().id(), "discovery.dns.job_1");
    }
}
