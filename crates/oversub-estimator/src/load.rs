//! System load sampling.

/// Source of the node's 1-minute load average.
///
/// Longer windows are deliberately ignored; the estimator reacts to
/// current contention, not to history. When no sample is available the
/// estimator fails open: it applies no damping and offers full capacity
/// minus current allocation. Availability of oversubscribed capacity is
/// preferred over caution here, and the choice is intentional.
pub trait LoadSampler: Send + Sync + 'static {
    /// The 1-minute load average, or `None` when the platform cannot
    /// provide one.
    fn one_minute(&self) -> Option<f64>;
}

/// Samples the host via `sysinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoadSampler;

impl LoadSampler for SystemLoadSampler {
    #[cfg(unix)]
    fn one_minute(&self) -> Option<f64> {
        let load = sysinfo::System::load_average().one;
        load.is_finite().then_some(load)
    }

    #[cfg(not(unix))]
    fn one_minute(&self) -> Option<f64> {
        None
    }
}

/// A fixed sample, for tests and for agents that inject load externally.
#[derive(Debug, Clone, Copy)]
pub struct StaticLoadSampler {
    pub load: Option<f64>,
}

impl StaticLoadSampler {
    pub fn new(load: f64) -> Self {
        Self { load: Some(load) }
    }

    /// A sampler that never has a reading.
    pub fn unavailable() -> Self {
        Self { load: None }
    }
}

impl LoadSampler for StaticLoadSampler {
    fn one_minute(&self) -> Option<f64> {
        self.load
    }
}
