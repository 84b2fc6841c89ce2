//! Estimator error types.

use thiserror::Error;

/// Result type alias for estimator operations.
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Errors that can occur while building or querying the estimator.
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("resource estimator has already been initialized")]
    AlreadyInitialized,

    #[error("resource estimator is not initialized")]
    NotInitialized,

    #[error("resource estimator has shut down")]
    Terminated,

    #[error("load thresholds out of order: lower {lower}, upper {upper}")]
    InvalidThresholds { lower: f64, upper: f64 },

    #[error("usage provider error: {0}")]
    UsageProvider(#[from] anyhow::Error),
}
