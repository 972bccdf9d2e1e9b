//! The agent's own metrics (`prometheus.exporter.self`).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::component::{Options, Registration};
use crate::error::{Result, RuntimeError};
use crate::exporter::{Creator, Integration, registration as exporter_registration};
use crate::http::metrics_router;
use crate::instance::default_instance_key;

pub const COMPONENT_NAME: &str = "prometheus.exporter.self";
pub const INTEGRATION_NAME: &str = "agent";
pub const DEFAULT_NAMESPACE: &str = "agent";

const UPTIME_REFRESH: Duration = Duration::from_secs(1);

/// Arguments of `prometheus.exporter.self`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelfArguments {
    /// Metric name prefix, `agent` when unset.
    pub namespace: Option<String>,
    /// Labels added to every metric.
    pub const_labels: BTreeMap<String, String>,
}

/// Serves build info and uptime.
pub struct SelfIntegration {
    registry: Arc<Registry>,
    uptime: Gauge<f64, AtomicU64>,
    started: Instant,
}

impl SelfIntegration {
    pub fn new(args: &SelfArguments) -> Result<Self> {
        let namespace = args.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
        if !is_valid_metric_name(namespace) {
            return Err(RuntimeError::build(
                INTEGRATION_NAME,
                format!("invalid namespace {:?}", namespace),
            ));
        }
        for name in args.const_labels.keys() {
            if !is_valid_label_name(name) {
                return Err(RuntimeError::build(
                    INTEGRATION_NAME,
                    format!("invalid const label name {:?}", name),
                ));
            }
        }

        let labels = args
            .const_labels
            .iter()
            .map(|(k, v)| (Cow::Owned(k.clone()), Cow::Owned(v.clone())));
        let mut registry = Registry::with_prefix_and_labels(namespace, labels);

        let build_info = Family::<Vec<(String, String)>, Gauge>::default();
        registry.register(
            "build_info",
            "Version of the running agent, always 1",
            build_info.clone(),
        );
        build_info
            .get_or_create(&vec![(
                "version".to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            )])
            .set(1);

        let uptime = Gauge::<f64, AtomicU64>::default();
        registry.register(
            "uptime_seconds",
            "Seconds since the integration was built",
            uptime.clone(),
        );

        Ok(Self {
            registry: Arc::new(registry),
            uptime,
            started: Instant::now(),
        })
    }
}

#[async_trait]
impl Integration for SelfIntegration {
    fn metrics_handler(&self) -> Result<Router> {
        Ok(metrics_router(self.registry.clone()))
    }

    async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let mut ticker = tokio::time::interval(UPTIME_REFRESH);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Self integration stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    self.uptime.set(self.started.elapsed().as_secs_f64());
                }
            }
        }
    }
}

fn create(opts: &Options, args: SelfArguments) -> Result<(Arc<dyn Integration>, String)> {
    let integration = SelfIntegration::new(&args)?;
    Ok((
        Arc::new(integration),
        default_instance_key(&opts.http_listen_addr),
    ))
}

pub fn registration() -> Registration {
    let creator: Creator<SelfArguments> = Arc::new(create);
    exporter_registration(COMPONENT_NAME, INTEGRATION_NAME, creator)
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// Label names are identifiers; the `__` prefix is reserved.
fn is_valid_label_name(name: &str) -> bool {
    flowconv_common::is_valid_identifier(name)
        && !name.starts_with(flowconv_common::target::RESERVED_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::encode_metrics;

    #[test]
    fn test_default_metrics() {
        let integration = SelfIntegration::new(&SelfArguments::default()).unwrap();
        let text = encode_metrics(&integration.registry).unwrap();
        assert!(text.contains(&format!(
            "agent_build_info{{version=\"{}\"}} 1",
            env!("CARGO_PKG_VERSION")
        )));
        assert!(text.contains("# TYPE agent_uptime_seconds gauge"));
    }

    #[test]
    fn test_namespace_and_const_labels() {
        let args = SelfArguments {
            namespace: Some("edge".to_string()),
            const_labels: BTreeMap::from([("site".to_string(), "paris".to_string())]),
        };
        let integration = SelfIntegration::new(&args).unwrap();
        let text = encode_metrics(&integration.registry).unwrap();
        assert!(text.contains("edge_build_info{"));
        assert!(text.contains("site=\"paris\""));
    }

    #[test]
    fn test_invalid_arguments() {
        let bad_namespace = SelfArguments {
            namespace: Some("1agent".to_string()),
            ..Default::default()
        };
        assert!(SelfIntegration::new(&bad_namespace).is_err());

        let reserved_label = SelfArguments {
            const_labels: BTreeMap::from([("__name__".to_string(), "x".to_string())]),
            ..Default::default()
        };
        assert!(SelfIntegration::new(&reserved_label).is_err());
    }

    #[tokio::test]
    async fn test_run_updates_uptime() {
        let integration = Arc::new(SelfIntegration::new(&SelfArguments::default()).unwrap());
        let cancel = CancellationToken::new();

        let task = {
            let integration = integration.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { integration.run(cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        task.await.unwrap().unwrap();
        assert!(integration.uptime.get() > 0.0);
    }
}
