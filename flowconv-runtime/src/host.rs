//! A minimal host: builds registered components, collects their exports
//! and serves their handlers.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use flowconv_common::{ExportTable, Reference};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::component::{Arguments, Component, OnStateChange, Options, Registration};
use crate::error::{Result, RuntimeError};
use crate::http::host_router;

/// Hosts components and routes HTTP requests to them.
pub struct Host {
    listen_addr: String,
    registrations: BTreeMap<String, Registration>,
    components: RwLock<BTreeMap<String, Arc<dyn Component>>>,
    exports: Arc<Mutex<ExportTable>>,
}

impl Host {
    /// Create a host with no registrations. `listen_addr` is advertised to
    /// components as the address their handlers are reachable on.
    pub fn new(listen_addr: impl Into<String>) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            registrations: BTreeMap::new(),
            components: RwLock::new(BTreeMap::new()),
            exports: Arc::new(Mutex::new(ExportTable::new())),
        }
    }

    /// Create a host knowing every built-in component.
    pub fn with_builtin(listen_addr: impl Into<String>) -> Self {
        let mut host = Self::new(listen_addr);
        for registration in crate::integrations::registrations() {
            host.register(registration);
        }
        host
    }

    pub fn register(&mut self, registration: Registration) {
        self.registrations
            .insert(registration.name.clone(), registration);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registrations.contains_key(name)
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Build the component `<name>.<label>` from untyped arguments.
    pub fn build(&self, name: &str, label: &str, args: Arguments) -> Result<Arc<dyn Component>> {
        let registration = self
            .registrations
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownComponent(name.to_string()))?;

        let id = format!("{}.{}", name, label);
        // Held until the component is inserted so concurrent builds of one
        // id cannot both succeed.
        let mut components = self.components.write();
        let slot = match components.entry(id.clone()) {
            Entry::Occupied(_) => return Err(RuntimeError::DuplicateComponent(id)),
            Entry::Vacant(slot) => slot,
        };

        let exports = self.exports.clone();
        let publish_id = id.clone();
        let on_state_change: OnStateChange = Arc::new(move |value: Value| {
            if let Err(e) = exports.lock().publish(publish_id.clone(), &value) {
                warn!(component = %publish_id, error = %e, "Failed to publish exports");
            }
        });

        let opts = Options::new(id.clone(), self.listen_addr.clone(), on_state_change);
        let component = (registration.build)(opts, args)?;
        slot.insert(component.clone());
        drop(components);

        info!(component = %id, "Built component");
        Ok(component)
    }

    pub fn component(&self, id: &str) -> Option<Arc<dyn Component>> {
        self.components.read().get(id).cloned()
    }

    /// Ids of all built components, sorted.
    pub fn component_ids(&self) -> Vec<String> {
        self.components.read().keys().cloned().collect()
    }

    /// Last exports published by a component.
    pub fn exports(&self, id: &str) -> Option<Value> {
        self.exports.lock().get(id).cloned()
    }

    /// Resolve a reference against the published exports.
    pub fn resolve(&self, reference: &Reference) -> Result<Value> {
        Ok(reference.resolve(&self.exports.lock())?.clone())
    }

    pub fn router(self: &Arc<Self>) -> Router {
        host_router(self.clone())
    }

    /// Start the run loop of every component, each on a child of `cancel`.
    pub fn spawn_components(&self, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        let components: Vec<_> = self
            .components
            .read()
            .iter()
            .map(|(id, c)| (id.clone(), c.clone()))
            .collect();

        components
            .into_iter()
            .map(|(id, component)| {
                let token = cancel.child_token();
                tokio::spawn(async move {
                    if let Err(e) = component.run(token).await {
                        error!(component = %id, error = %e, "Component exited with error");
                    }
                })
            })
            .collect()
    }

    /// Run every component and serve the host router until `cancel` fires.
    pub async fn serve(self: Arc<Self>, addr: SocketAddr, cancel: CancellationToken) -> Result<()> {
        let tasks = self.spawn_components(&cancel);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, components = tasks.len(), "Host listening");

        let shutdown = cancel.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("Host shutting down");
            })
            .await?;

        cancel.cancel();
        for task in tasks {
            if let Err(e) = task.await {
                error!(error = %e, "Component task panicked");
            }
        }

        info!("Host stopped");
        Ok(())
    }
}
