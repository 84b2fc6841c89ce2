//! A single named, tagged resource quantity.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A named quantity with a revocable/guaranteed tag and optional
/// allocation bookkeeping.
///
/// Two resources with the same name coexist in a set when their tags or
/// allocations differ; they merge only on a full `(name, revocable,
/// allocation)` key match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub value: Value,
    /// Capacity that may be withdrawn under contention.
    pub revocable: bool,
    /// The consumer this quantity is currently assigned to, if any.
    /// Configured totals carry `None`; usage snapshots carry `Some`.
    pub allocation: Option<String>,
}

impl Resource {
    /// A guaranteed scalar quantity.
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: Value::Scalar(value),
            revocable: false,
            allocation: None,
        }
    }

    /// A guaranteed range quantity. Ranges are normalized on the way in.
    pub fn ranges(name: impl Into<String>, ranges: Vec<(u64, u64)>) -> Self {
        Self {
            name: name.into(),
            value: Value::Ranges(crate::value::normalize_ranges(ranges)),
            revocable: false,
            allocation: None,
        }
    }

    /// Re-tag as revocable.
    pub fn as_revocable(mut self) -> Self {
        self.revocable = true;
        self
    }

    /// Attach allocation bookkeeping.
    pub fn allocated_to(mut self, consumer: impl Into<String>) -> Self {
        self.allocation = Some(consumer.into());
        self
    }

    /// The merge key: quantities combine only when all three parts match.
    pub(crate) fn key(&self) -> (&str, bool, Option<&str>) {
        (&self.name, self.revocable, self.allocation.as_deref())
    }
}
