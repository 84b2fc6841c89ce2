//! The estimator facade: the stable contract exposed to the agent.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use oversub_resources::ResourceSet;

use crate::actor::{EstimateRequest, EstimatorActor};
use crate::config::EstimatorConfig;
use crate::error::{EstimatorError, EstimatorResult};
use crate::load::{LoadSampler, SystemLoadSampler};
use crate::usage::UsageProvider;

/// Mailbox depth. Senders queue beyond this, which only adds
/// backpressure on an agent issuing faster than the actor answers.
const MAILBOX_CAPACITY: usize = 16;

/// Lifecycle wrapper around the estimation actor.
///
/// At most one actor is ever bound to a facade: `initialize` succeeds
/// once, and the bound actor's identity is fixed from then on. Queries
/// before initialization fail with [`EstimatorError::NotInitialized`];
/// after [`shutdown`](Self::shutdown) they fail with
/// [`EstimatorError::Terminated`].
///
/// Call [`shutdown`](Self::shutdown) to tear down: it waits until the
/// actor has drained and terminated. Dropping the facade without it
/// closes the mailbox but detaches the actor task, which finishes any
/// in-flight query on its own time.
pub struct ResourceEstimator {
    config: EstimatorConfig,
    /// Taken by the actor at initialize; defaults to the host sampler.
    sampler: Option<Box<dyn LoadSampler>>,
    initialized: bool,
    actor: Option<ActorHandle>,
}

struct ActorHandle {
    requests: mpsc::Sender<EstimateRequest>,
    task: JoinHandle<()>,
}

impl ResourceEstimator {
    /// Create an uninitialized estimator sampling load from the host.
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            sampler: None,
            initialized: false,
            actor: None,
        }
    }

    /// Replace the load sampler. Only meaningful before `initialize`.
    pub fn with_sampler(mut self, sampler: Box<dyn LoadSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Bind the usage provider and spawn the estimation actor.
    ///
    /// Succeeds at most once per facade; a second call fails with
    /// [`EstimatorError::AlreadyInitialized`] and leaves the running
    /// actor untouched. Exclusive access (`&mut self`) rules out two
    /// actors being bound concurrently.
    ///
    /// Must be called from within a tokio runtime.
    pub fn initialize(&mut self, usage: UsageProvider) -> EstimatorResult<()> {
        if self.initialized {
            return Err(EstimatorError::AlreadyInitialized);
        }

        let sampler = self
            .sampler
            .take()
            .unwrap_or_else(|| Box::new(SystemLoadSampler));
        let (requests, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = EstimatorActor::new(self.config.clone(), usage, sampler, mailbox);
        let task = tokio::spawn(actor.run());

        self.initialized = true;
        self.actor = Some(ActorHandle { requests, task });
        Ok(())
    }

    /// Resources that can currently be offered for oversubscription.
    ///
    /// Forwarded to the actor over its mailbox; the actor's result comes
    /// back unchanged. Concurrent callers are answered in arrival order.
    pub async fn oversubscribable(&self) -> EstimatorResult<ResourceSet> {
        if !self.initialized {
            return Err(EstimatorError::NotInitialized);
        }
        let handle = self.actor.as_ref().ok_or(EstimatorError::Terminated)?;

        let (respond_to, response) = oneshot::channel();
        handle
            .requests
            .send(EstimateRequest::Oversubscribable { respond_to })
            .await
            .map_err(|_| EstimatorError::Terminated)?;
        response.await.map_err(|_| EstimatorError::Terminated)?
    }

    /// Signal-then-wait teardown.
    ///
    /// Closes the mailbox and waits for the actor to drain queued
    /// requests and terminate; no query is in flight afterwards.
    /// Idempotent. The facade stays terminated: it cannot be
    /// re-initialized.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.actor.take() {
            drop(handle.requests);
            let _ = handle.task.await;
            info!("resource estimator torn down");
        }
    }
}
