//! Estimator configuration and the load-to-factor ramp.

use oversub_resources::ResourceSet;

use crate::error::{EstimatorError, EstimatorResult};

/// Immutable estimator configuration.
///
/// Built once at module-construction time and held by value by the actor
/// for its whole lifetime; nothing here changes after startup.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    total_revocable: ResourceSet,
    /// The `cpus` scalar within the total, the quantity the ramp
    /// withholds from. Zero when the total carries no cpus.
    revocable_limit: f64,
    load_upper_limit: f64,
    load_lower_limit: f64,
}

impl EstimatorConfig {
    /// Build a config from the capacity eligible for oversubscription.
    ///
    /// Every quantity in `total` is re-tagged revocable. Fails when the
    /// thresholds are not ordered `0 ≤ lower < upper`.
    pub fn new(
        total: ResourceSet,
        load_lower_limit: f64,
        load_upper_limit: f64,
    ) -> EstimatorResult<Self> {
        if !(load_lower_limit >= 0.0 && load_lower_limit < load_upper_limit) {
            return Err(EstimatorError::InvalidThresholds {
                lower: load_lower_limit,
                upper: load_upper_limit,
            });
        }

        let total_revocable = total.as_revocable();
        let revocable_limit = total_revocable.cpus().unwrap_or(0.0);

        Ok(Self {
            total_revocable,
            revocable_limit,
            load_upper_limit,
            load_lower_limit,
        })
    }

    pub fn total_revocable(&self) -> &ResourceSet {
        &self.total_revocable
    }

    pub fn revocable_limit(&self) -> f64 {
        self.revocable_limit
    }

    pub fn load_upper_limit(&self) -> f64 {
        self.load_upper_limit
    }

    pub fn load_lower_limit(&self) -> f64 {
        self.load_lower_limit
    }

    /// Fraction of the revocable cpu limit to withhold at the given
    /// 1-minute load average.
    ///
    /// Zero at or below the lower threshold, one at or above the upper
    /// threshold, and a quadratic ramp in between: withdrawal is gentle
    /// while load is close to the lower threshold and sharp as it
    /// approaches the upper one.
    pub fn damping_factor(&self, load_one: f64) -> f64 {
        if load_one <= self.load_lower_limit {
            0.0
        } else if load_one >= self.load_upper_limit {
            1.0
        } else {
            let ramp = (load_one - self.load_lower_limit)
                / (self.load_upper_limit - self.load_lower_limit);
            ramp * ramp
        }
    }
}
