//! Resource spec-string parsing.
//!
//! The agent hands resource totals around as compact strings:
//!
//! ```text
//! cpus:4;mem:2048;ports:[31000-32000,33000-33999];disks:{a,b}
//! ```
//!
//! Entries are `name:value` pairs separated by semicolons. A bare number
//! is a scalar, `[lo-hi,...]` is a range list, `{a,b,...}` is a set.

use std::collections::BTreeSet;

use crate::error::{ResourceError, ResourceResult};
use crate::resource::Resource;
use crate::set::ResourceSet;
use crate::value::Value;

impl ResourceSet {
    /// Parse a spec string into a set of guaranteed, unallocated
    /// quantities. Malformed input is rejected as a whole.
    pub fn parse(spec: &str) -> ResourceResult<ResourceSet> {
        let mut set = ResourceSet::new();
        let mut seen_any = false;

        for entry in spec.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            seen_any = true;

            let (name, raw) = entry
                .split_once(':')
                .ok_or_else(|| ResourceError::MalformedEntry(entry.to_string()))?;
            let name = name.trim();
            let raw = raw.trim();
            if name.is_empty() || raw.is_empty() {
                return Err(ResourceError::MalformedEntry(entry.to_string()));
            }

            let value = parse_value(name, raw)?;
            set.add(Resource {
                name: name.to_string(),
                value,
                revocable: false,
                allocation: None,
            })?;
        }

        if !seen_any {
            return Err(ResourceError::EmptySpec);
        }
        Ok(set)
    }
}

fn parse_value(name: &str, raw: &str) -> ResourceResult<Value> {
    if let Some(body) = raw.strip_prefix('[') {
        let body = body
            .strip_suffix(']')
            .ok_or_else(|| malformed(name, "ranges", raw))?;
        return parse_ranges(name, raw, body);
    }
    if let Some(body) = raw.strip_prefix('{') {
        let body = body
            .strip_suffix('}')
            .ok_or_else(|| malformed(name, "set", raw))?;
        return parse_set(name, raw, body);
    }

    let scalar: f64 = raw.parse().map_err(|_| malformed(name, "scalar", raw))?;
    if !scalar.is_finite() || scalar < 0.0 {
        return Err(malformed(name, "scalar", raw));
    }
    Ok(Value::Scalar(scalar))
}

fn parse_ranges(name: &str, raw: &str, body: &str) -> ResourceResult<Value> {
    let mut ranges = Vec::new();
    for part in body.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (lo, hi) = part
            .split_once('-')
            .ok_or_else(|| malformed(name, "ranges", raw))?;
        let lo: u64 = lo.trim().parse().map_err(|_| malformed(name, "ranges", raw))?;
        let hi: u64 = hi.trim().parse().map_err(|_| malformed(name, "ranges", raw))?;
        if lo > hi {
            return Err(malformed(name, "ranges", raw));
        }
        ranges.push((lo, hi));
    }
    if ranges.is_empty() {
        return Err(malformed(name, "ranges", raw));
    }
    Ok(Value::Ranges(crate::value::normalize_ranges(ranges)))
}

fn parse_set(name: &str, raw: &str, body: &str) -> ResourceResult<Value> {
    let items: BTreeSet<String> = body
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(malformed(name, "set", raw));
    }
    Ok(Value::Set(items))
}

fn malformed(name: &str, kind: &'static str, value: &str) -> ResourceError {
    ResourceError::MalformedValue {
        name: name.to_string(),
        kind,
        value: value.to_string(),
    }
}
