//! The usage-snapshot contract between the agent and the estimator.

use serde::{Deserialize, Serialize};

use oversub_resources::{ResourceResult, ResourceSet};

/// Resources held by one executor running on the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutorUsage {
    pub allocated: ResourceSet,
}

/// A point-in-time snapshot of per-executor allocations on the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub executors: Vec<ExecutorUsage>,
}

impl ResourceUsage {
    /// Sum of the revocable-tagged allocations across all executors.
    pub fn allocated_revocable(&self) -> ResourceResult<ResourceSet> {
        let mut total = ResourceSet::new();
        for executor in &self.executors {
            total.merge(&executor.allocated.revocable())?;
        }
        Ok(total)
    }
}

/// Future returned by a usage provider.
pub type UsageFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = anyhow::Result<ResourceUsage>> + Send>>;

/// Callback the agent supplies at `initialize` time; invoked once per
/// query. Failures propagate to the caller unchanged.
pub type UsageProvider = Box<dyn Fn() -> UsageFuture + Send + Sync>;
