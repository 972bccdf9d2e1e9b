//! Runtime adapter turning a run-forever integration into a reloadable
//! component.
//!
//! Every successful update replaces the stored integration and signals the
//! run loop over a capacity-1 channel. The run loop starts one generation
//! per signal it drains: it cancels the previous generation's token, derives
//! a new child token and spawns the integration on it. It never waits for
//! the previous generation to exit, so old and new generations may briefly
//! overlap.
//!
//! Signals sent while one is already pending are dropped. Several updates
//! in quick succession therefore start a single generation, running the
//! integration of the last update.
//!
//! [`Component::handler`] returns the handler of the most recently started
//! generation. Between a successful update and the run loop draining its
//! signal it still serves the previous generation.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use flowconv_common::Target;
use flowconv_common::target::{ADDRESS_LABEL, INSTANCE_LABEL, JOB_LABEL, METRICS_PATH_LABEL};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::component::{Arguments, Component, Options, Registration};
use crate::error::{Result, RuntimeError};

/// A legacy integration: serves metrics over HTTP and runs until cancelled.
#[async_trait]
pub trait Integration: Send + Sync {
    /// Router serving `/metrics` for this integration.
    fn metrics_handler(&self) -> Result<Router>;

    /// Run until `cancel` fires.
    async fn run(&self, cancel: CancellationToken) -> Result<()>;
}

/// Builds an integration from typed arguments. Returns the integration and
/// its instance key.
pub type Creator<A> =
    Arc<dyn Fn(&Options, A) -> Result<(Arc<dyn Integration>, String)> + Send + Sync>;

/// Lifecycle phase of an [`ExporterComponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, no generation started yet.
    Ready,
    /// A generation is running the current integration.
    Running,
    /// A generation is running, a newer integration waits to be started.
    Reloading,
    /// The run loop has exited.
    Stopped,
}

/// Exports of an exporter component: one scrape target pointing at the
/// host route of its handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExporterExports {
    pub targets: Vec<Target>,
}

struct State {
    integration: Option<Arc<dyn Integration>>,
    handler: Option<Router>,
    exports: Option<ExporterExports>,
    epoch: u64,
    cancel: Option<CancellationToken>,
    phase: Phase,
}

/// Component adapter around an [`Integration`].
pub struct ExporterComponent<A> {
    opts: Options,
    name: String,
    creator: Creator<A>,
    state: Mutex<State>,
    reload_tx: mpsc::Sender<()>,
    reload_rx: Mutex<Option<mpsc::Receiver<()>>>,
}

impl<A> ExporterComponent<A> {
    /// Build the component and apply its initial arguments.
    ///
    /// `name` is the integration name used in the exported job label
    /// `integrations/<name>`.
    pub fn build(
        opts: Options,
        name: impl Into<String>,
        args: A,
        creator: Creator<A>,
    ) -> Result<Self> {
        let (reload_tx, reload_rx) = mpsc::channel(1);
        let component = Self {
            opts,
            name: name.into(),
            creator,
            state: Mutex::new(State {
                integration: None,
                handler: None,
                exports: None,
                epoch: 0,
                cancel: None,
                phase: Phase::Ready,
            }),
            reload_tx,
            reload_rx: Mutex::new(Some(reload_rx)),
        };

        component.apply(args)?;
        Ok(component)
    }

    /// Replace the integration with one built from `args`.
    ///
    /// On error the current integration, handler and exports are kept.
    pub fn apply(&self, args: A) -> Result<()> {
        let (integration, instance) = (self.creator)(&self.opts, args).inspect_err(|e| {
            warn!(component = %self.opts.id, error = %e, "Failed to update integration");
        })?;

        let exports = self.exports_for(&instance);
        let value = serde_json::to_value(&exports).map_err(flowconv_common::Error::from)?;
        {
            let mut state = self.state.lock();
            state.integration = Some(integration);
            state.exports = Some(exports);
            if state.phase == Phase::Running {
                state.phase = Phase::Reloading;
            }
        }

        (self.opts.on_state_change)(value);
        self.signal_reload();
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.opts.id
    }

    /// Number of generations started so far.
    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Exports published by the last successful update.
    pub fn exports(&self) -> Option<ExporterExports> {
        self.state.lock().exports.clone()
    }

    fn exports_for(&self, instance: &str) -> ExporterExports {
        let target = Target::new()
            .with_label(ADDRESS_LABEL, self.opts.http_listen_addr.clone())
            .with_label(
                METRICS_PATH_LABEL,
                format!("{}/metrics", self.opts.http_path.trim_end_matches('/')),
            )
            .with_label(INSTANCE_LABEL, instance)
            .with_label(JOB_LABEL, format!("integrations/{}", self.name));
        ExporterExports {
            targets: vec![target],
        }
    }

    fn signal_reload(&self) {
        match self.reload_tx.try_send(()) {
            Ok(()) => debug!(component = %self.opts.id, "Reload signalled"),
            Err(TrySendError::Full(())) => {
                debug!(component = %self.opts.id, "Reload already pending")
            }
            Err(TrySendError::Closed(())) => {
                debug!(component = %self.opts.id, "Component stopped, reload ignored")
            }
        }
    }

    /// Start a generation running the current integration.
    ///
    /// If the new handler cannot be created the running generation is kept.
    fn start_generation(&self, parent: &CancellationToken) {
        let mut state = self.state.lock();
        let Some(integration) = state.integration.clone() else {
            return;
        };

        let handler = match integration.metrics_handler() {
            Ok(handler) => handler,
            Err(e) => {
                error!(component = %self.opts.id, error = %e, "Failed to create metrics handler");
                if state.phase == Phase::Reloading {
                    state.phase = Phase::Running;
                }
                return;
            }
        };

        if let Some(previous) = state.cancel.take() {
            previous.cancel();
        }
        let token = parent.child_token();
        state.cancel = Some(token.clone());
        state.handler = Some(handler);
        state.epoch += 1;
        state.phase = Phase::Running;
        let epoch = state.epoch;
        drop(state);

        info!(component = %self.opts.id, epoch, "Starting integration");
        let id = self.opts.id.clone();
        tokio::spawn(async move {
            match integration.run(token).await {
                Ok(()) => debug!(component = %id, epoch, "Integration exited"),
                Err(e) => error!(component = %id, epoch, error = %e, "Integration failed"),
            }
        });
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        if let Some(current) = state.cancel.take() {
            current.cancel();
        }
        state.phase = Phase::Stopped;
        info!(component = %self.opts.id, epochs = state.epoch, "Component stopped");
    }
}

#[async_trait]
impl<A> Component for ExporterComponent<A>
where
    A: DeserializeOwned + Send + 'static,
{
    async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let mut reload = self
            .reload_rx
            .lock()
            .take()
            .ok_or_else(|| RuntimeError::AlreadyRunning(self.opts.id.clone()))?;

        debug!(component = %self.opts.id, "Run loop started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                signal = reload.recv() => match signal {
                    Some(()) => self.start_generation(&cancel),
                    None => break,
                },
            }
        }

        self.stop();
        Ok(())
    }

    fn update(&self, args: Arguments) -> Result<()> {
        let args: A = flowconv_common::decode_untyped(&args)
            .map_err(|e| RuntimeError::arguments(&self.opts.id, e.to_string()))?;
        self.apply(args)
    }

    fn handler(&self) -> Option<Router> {
        self.state.lock().handler.clone()
    }
}

/// Registration building an [`ExporterComponent`] from untyped arguments.
pub fn registration<A>(name: &str, integration: &str, creator: Creator<A>) -> Registration
where
    A: DeserializeOwned + Send + 'static,
{
    let integration = integration.to_string();
    Registration::new(
        name,
        Arc::new(move |opts: Options, args: Arguments| {
            let args: A = flowconv_common::decode_untyped(&args)
                .map_err(|e| RuntimeError::arguments(&opts.id, e.to_string()))?;
            let component = ExporterComponent::build(opts, integration.clone(), args, creator.clone())?;
            Ok(Arc::new(component) as Arc<dyn Component>)
        }),
    )
}
