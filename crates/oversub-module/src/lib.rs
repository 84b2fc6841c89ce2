//! oversub-module — the agent-facing constructor.
//!
//! The host agent loads the estimator as a module, passing configuration
//! as opaque key/value string pairs. This crate parses those parameters,
//! validates them, and builds a ready-to-initialize
//! [`ResourceEstimator`]. Misconfiguration is fatal here: no estimator
//! is constructed and module load fails.

use thiserror::Error;

use oversub_estimator::{EstimatorConfig, EstimatorError, ResourceEstimator};
use oversub_resources::{ResourceError, ResourceSet};

/// Load at/above which offered capacity is driven to zero, unless
/// overridden by `load_upper_limit`.
pub const DEFAULT_LOAD_UPPER_LIMIT: f64 = 50.0;

/// Load at/below which full capacity (minus current allocation) is
/// offered, unless overridden by `load_lower_limit`.
pub const DEFAULT_LOAD_LOWER_LIMIT: f64 = 10.0;

/// Registration metadata handed to the host loader.
#[derive(Debug, Clone, Copy)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
}

pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    name: "oversub_dynamic_resource_estimator",
    author: "oversub",
    description: "Load-damped revocable resource estimation for the node agent.",
};

/// Errors that fail module construction.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("missing required parameter: resources")]
    MissingResources,

    #[error("invalid resources parameter: {0}")]
    Resources(#[from] ResourceError),

    #[error("invalid value {value:?} for parameter {key}")]
    MalformedParameter { key: &'static str, value: String },

    #[error(transparent)]
    Config(EstimatorError),
}

/// Ordered key/value parameters from the host agent.
///
/// Keys may repeat; the last occurrence wins, matching how the agent
/// layers overrides.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Build an estimator from module parameters.
///
/// `resources` is required; `load_upper_limit` and `load_lower_limit`
/// default to 50 and 10. Unknown keys are the host's business and are
/// ignored. The parsed resources are re-tagged revocable and the `cpus`
/// quantity becomes the revocable limit (zero if absent).
pub fn create(parameters: &Parameters) -> Result<ResourceEstimator, ModuleError> {
    let mut resources: Option<ResourceSet> = None;
    let mut load_upper_limit = DEFAULT_LOAD_UPPER_LIMIT;
    let mut load_lower_limit = DEFAULT_LOAD_LOWER_LIMIT;

    for (key, value) in parameters.iter() {
        match key {
            "resources" => resources = Some(ResourceSet::parse(value)?),
            "load_upper_limit" => {
                load_upper_limit = parse_limit("load_upper_limit", value)?;
            }
            "load_lower_limit" => {
                load_lower_limit = parse_limit("load_lower_limit", value)?;
            }
            _ => {}
        }
    }

    let resources = resources.ok_or(ModuleError::MissingResources)?;
    let config = EstimatorConfig::new(resources, load_lower_limit, load_upper_limit)
        .map_err(ModuleError::Config)?;
    Ok(ResourceEstimator::new(config))
}

fn parse_limit(key: &'static str, value: &str) -> Result<f64, ModuleError> {
    let parsed: f64 = value.trim().parse().map_err(|_| ModuleError::MalformedParameter {
        key,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(ModuleError::MalformedParameter {
            key,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}
