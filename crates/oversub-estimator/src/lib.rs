//! oversub-estimator — load-damped revocable capacity estimation.
//!
//! Answers one question for the node agent's oversubscription pipeline:
//! how much revocable capacity can this node offer right now? The answer
//! is the configured revocable total, damped by the 1-minute load average
//! and reduced by what running executors already hold.
//!
//! # Architecture
//!
//! ```text
//! ResourceEstimator (facade)
//!   ├── initialize(usage provider)  — once, spawns the actor
//!   ├── oversubscribable()          — forwarded over the mailbox
//!   └── shutdown()                  — close mailbox, await drain
//!
//! EstimatorActor (tokio task)
//!   ├── mpsc mailbox, FIFO, one request at a time
//!   ├── awaits the usage snapshot (the only suspension point)
//!   └── total − ⌊factor × cpu limit⌋ − allocated
//! ```
//!
//! The load-to-factor ramp is quadratic between the two configured
//! thresholds, so capacity is withdrawn gently near the lower threshold
//! and sharply near the upper one.

pub mod config;
pub mod error;
pub mod load;
pub mod usage;

mod actor;
mod estimator;

pub use config::EstimatorConfig;
pub use error::{EstimatorError, EstimatorResult};
pub use estimator::ResourceEstimator;
pub use load::{LoadSampler, StaticLoadSampler, SystemLoadSampler};
pub use usage::{ExecutorUsage, ResourceUsage, UsageFuture, UsageProvider};
