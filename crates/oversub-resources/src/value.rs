//! Quantity values: scalars, inclusive ranges, and text sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Scalars at or below this are considered consumed and dropped.
pub(crate) const SCALAR_EPSILON: f64 = 1e-9;

/// The value carried by a single resource quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A fractional amount, e.g. `cpus: 3.5`.
    Scalar(f64),
    /// Inclusive integer ranges, e.g. ports `[31000-32000]`. Kept
    /// normalized: sorted, non-overlapping, non-adjacent.
    Ranges(Vec<(u64, u64)>),
    /// A set of named items, e.g. disk volumes.
    Set(BTreeSet<String>),
}

impl Value {
    /// The kind name, used in parse errors and conflict reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Ranges(_) => "ranges",
            Value::Set(_) => "set",
        }
    }

    /// Whether the value has been fully consumed.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(v) => *v <= SCALAR_EPSILON,
            Value::Ranges(r) => r.is_empty(),
            Value::Set(s) => s.is_empty(),
        }
    }

    /// Merge `other` into `self`. Kinds are checked by the caller; a
    /// mismatched pair merges nothing.
    pub(crate) fn merge(&mut self, other: &Value) {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => *a += *b,
            (Value::Ranges(a), Value::Ranges(b)) => {
                a.extend_from_slice(b);
                *a = normalize_ranges(std::mem::take(a));
            }
            (Value::Set(a), Value::Set(b)) => {
                a.extend(b.iter().cloned());
            }
            _ => {}
        }
    }

    /// Remove `other` from `self`, saturating at empty. Kinds are checked
    /// by the caller; a mismatched pair removes nothing.
    pub(crate) fn saturating_sub(&mut self, other: &Value) {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => *a = (*a - *b).max(0.0),
            (Value::Ranges(a), Value::Ranges(b)) => {
                *a = subtract_ranges(a, b);
            }
            (Value::Set(a), Value::Set(b)) => {
                for item in b {
                    a.remove(item);
                }
            }
            _ => {}
        }
    }
}

/// Sort, drop inverted ranges, and coalesce overlapping or adjacent ones.
pub(crate) fn normalize_ranges(mut ranges: Vec<(u64, u64)>) -> Vec<(u64, u64)> {
    ranges.retain(|(lo, hi)| lo <= hi);
    ranges.sort_unstable();

    let mut out: Vec<(u64, u64)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match out.last_mut() {
            Some((_, prev_hi)) if lo <= prev_hi.saturating_add(1) => {
                *prev_hi = (*prev_hi).max(hi);
            }
            _ => out.push((lo, hi)),
        }
    }
    out
}

/// Remove every point of `b` from `a`. Both inputs are normalized.
fn subtract_ranges(a: &[(u64, u64)], b: &[(u64, u64)]) -> Vec<(u64, u64)> {
    let mut out = Vec::new();
    for &(lo, hi) in a {
        let mut cursor = lo;
        for &(b_lo, b_hi) in b {
            if b_hi < cursor {
                continue;
            }
            if b_lo > hi {
                break;
            }
            if b_lo > cursor {
                out.push((cursor, b_lo - 1));
            }
            cursor = b_hi.saturating_add(1);
            if cursor > hi {
                break;
            }
        }
        if cursor <= hi {
            out.push((cursor, hi));
        }
    }
    out
}
