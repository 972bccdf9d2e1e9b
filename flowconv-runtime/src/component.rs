//! The contract between the host and every runnable component.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Untyped component arguments, decoded by each component into its own type.
pub type Arguments = Value;

/// Callback publishing a component's exports to the host.
pub type OnStateChange = Arc<dyn Fn(Value) + Send + Sync>;

/// Constructor stored in a [`Registration`].
pub type BuildFn = Arc<dyn Fn(Options, Arguments) -> Result<Arc<dyn Component>> + Send + Sync>;

/// A live component.
///
/// The host calls `update` and `run` from different tasks; implementations
/// synchronize internally.
#[async_trait]
pub trait Component: Send + Sync {
    /// Run until `cancel` fires.
    async fn run(&self, cancel: CancellationToken) -> Result<()>;

    /// Apply new arguments. On error the component keeps its previous state.
    fn update(&self, args: Arguments) -> Result<()>;

    /// HTTP handler for components that serve metrics.
    fn handler(&self) -> Option<Router> {
        None
    }
}

/// Host-provided settings for one component instance.
#[derive(Clone)]
pub struct Options {
    /// `<name path>.<label>`
    pub id: String,
    /// Address the host HTTP server listens on.
    pub http_listen_addr: String,
    /// Path prefix under which the host routes to this component's handler.
    pub http_path: String,
    pub on_state_change: OnStateChange,
}

impl Options {
    /// Options for a component served under the standard host path.
    pub fn new(
        id: impl Into<String>,
        http_listen_addr: impl Into<String>,
        on_state_change: OnStateChange,
    ) -> Self {
        let id = id.into();
        Self {
            http_path: component_path(&id),
            id,
            http_listen_addr: http_listen_addr.into(),
            on_state_change,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("id", &self.id)
            .field("http_listen_addr", &self.http_listen_addr)
            .field("http_path", &self.http_path)
            .finish_non_exhaustive()
    }
}

/// Host path prefix of a component's handler.
pub fn component_path(id: &str) -> String {
    format!("/api/v0/component/{}/", id)
}

/// A component name paired with its constructor.
#[derive(Clone)]
pub struct Registration {
    /// Component name, e.g. `prometheus.exporter.self`.
    pub name: String,
    pub build: BuildFn,
}

impl Registration {
    pub fn new(name: impl Into<String>, build: BuildFn) -> Self {
        Self {
            name: name.into(),
            build,
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
