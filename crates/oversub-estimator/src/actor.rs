//! The estimation actor: a tokio task draining an ordered mailbox.
//!
//! Concurrent queries from the agent are serialized in arrival order;
//! the actor processes one request at a time, so no locking is needed
//! around the (immutable) config or the per-request computation. The
//! await on the usage provider is the single suspension point: other
//! tasks in the process run during the wait, but the next request for
//! this actor does not start until the current one finishes.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use oversub_resources::{Resource, ResourceSet};

use crate::config::EstimatorConfig;
use crate::error::{EstimatorError, EstimatorResult};
use crate::load::LoadSampler;
use crate::usage::UsageProvider;

/// A queued query plus the channel its answer goes back on.
pub(crate) enum EstimateRequest {
    Oversubscribable {
        respond_to: oneshot::Sender<EstimatorResult<ResourceSet>>,
    },
}

pub(crate) struct EstimatorActor {
    config: EstimatorConfig,
    usage: UsageProvider,
    sampler: Box<dyn LoadSampler>,
    requests: mpsc::Receiver<EstimateRequest>,
}

impl EstimatorActor {
    pub(crate) fn new(
        config: EstimatorConfig,
        usage: UsageProvider,
        sampler: Box<dyn LoadSampler>,
        requests: mpsc::Receiver<EstimateRequest>,
    ) -> Self {
        Self {
            config,
            usage,
            sampler,
            requests,
        }
    }

    /// Drain the mailbox until every sender is gone, then terminate.
    pub(crate) async fn run(mut self) {
        info!(
            revocable_limit = self.config.revocable_limit(),
            load_lower_limit = self.config.load_lower_limit(),
            load_upper_limit = self.config.load_upper_limit(),
            "resource estimator started"
        );

        while let Some(request) = self.requests.recv().await {
            match request {
                EstimateRequest::Oversubscribable { respond_to } => {
                    let result = self.estimate().await;
                    // The caller may have given up waiting; that is fine.
                    let _ = respond_to.send(result);
                }
            }
        }

        info!("resource estimator stopped");
    }

    /// One estimation pass: snapshot, damp, subtract.
    async fn estimate(&self) -> EstimatorResult<ResourceSet> {
        let usage = (self.usage)().await.map_err(EstimatorError::UsageProvider)?;

        let allocated_revocable = usage
            .allocated_revocable()
            .map_err(|e| EstimatorError::UsageProvider(e.into()))?;
        // Configured totals carry no allocation bookkeeping; strip it
        // from the snapshot sum so the subtraction lines up.
        let unallocated = allocated_revocable.unallocate();

        let factor = match self.sampler.one_minute() {
            Some(load) => {
                let factor = self.config.damping_factor(load);
                debug!(load, factor, "sampled 1-minute load");
                factor
            }
            None => {
                // Fail open: no reading means no damping.
                warn!("load average unavailable, offering undamped capacity");
                0.0
            }
        };

        let withheld = (factor * self.config.revocable_limit()).trunc();
        let loss = ResourceSet::of(Resource::scalar("cpus", withheld).as_revocable());

        let offer = self
            .config
            .total_revocable()
            .saturating_sub(&loss)
            .saturating_sub(&unallocated);

        debug!(
            withheld_cpus = withheld,
            allocated_cpus = unallocated.cpus().unwrap_or(0.0),
            offered_cpus = offer.cpus().unwrap_or(0.0),
            "estimated oversubscribable resources"
        );

        Ok(offer)
    }
}
