//! The resource multiset: `(name, tag, allocation)`-keyed quantities.

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::resource::Resource;
use crate::value::Value;

/// An insertion-order-irrelevant collection of resource quantities.
///
/// Quantities with the same `(name, revocable, allocation)` key merge on
/// addition. Every name has exactly one value kind across the whole set;
/// `add` rejects redeclarations. Subtraction saturates: a scalar never
/// goes below zero and fully consumed quantities are dropped, so a set
/// produced by subtraction contains no negative entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSet {
    resources: Vec<Resource>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single quantity.
    pub fn of(resource: Resource) -> Self {
        let mut set = Self::new();
        set.merge_unchecked(resource);
        set
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Add a quantity, merging it into an existing entry on a key match.
    ///
    /// Fails if `resource.name` already exists in the set with a
    /// different value kind.
    pub fn add(&mut self, resource: Resource) -> ResourceResult<()> {
        if let Some(existing) = self.resources.iter().find(|r| r.name == resource.name)
            && existing.value.kind() != resource.value.kind()
        {
            return Err(ResourceError::KindConflict {
                name: resource.name,
                expected: existing.value.kind(),
                found: resource.value.kind(),
            });
        }
        self.merge_unchecked(resource);
        Ok(())
    }

    /// Add every quantity of `other` into `self`.
    pub fn merge(&mut self, other: &ResourceSet) -> ResourceResult<()> {
        for resource in &other.resources {
            self.add(resource.clone())?;
        }
        Ok(())
    }

    /// Subtract `other` from `self`, per matching key, saturating at
    /// empty. Quantities of `other` with no key match in `self` are
    /// ignored, as are kind mismatches.
    pub fn saturating_sub(&self, other: &ResourceSet) -> ResourceSet {
        let mut out = self.clone();
        for rhs in &other.resources {
            if let Some(lhs) = out.resources.iter_mut().find(|r| r.key() == rhs.key()) {
                lhs.value.saturating_sub(&rhs.value);
            }
        }
        out.resources.retain(|r| !r.value.is_empty());
        out
    }

    /// The revocable-tagged subset.
    pub fn revocable(&self) -> ResourceSet {
        ResourceSet {
            resources: self
                .resources
                .iter()
                .filter(|r| r.revocable)
                .cloned()
                .collect(),
        }
    }

    /// Strip allocation bookkeeping from every quantity, merging entries
    /// that collide once it is gone.
    pub fn unallocate(self) -> ResourceSet {
        let mut out = ResourceSet::new();
        for mut resource in self.resources {
            resource.allocation = None;
            out.merge_unchecked(resource);
        }
        out
    }

    /// Re-tag every quantity revocable, merging entries that collide
    /// once the tags agree.
    pub fn as_revocable(self) -> ResourceSet {
        let mut out = ResourceSet::new();
        for mut resource in self.resources {
            resource.revocable = true;
            out.merge_unchecked(resource);
        }
        out
    }

    /// Total scalar amount carried under `name`, across tags and
    /// allocations. `None` if the set has no scalar entry for it.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        let mut total = None;
        for resource in &self.resources {
            if resource.name == name
                && let Value::Scalar(v) = resource.value
            {
                total = Some(total.unwrap_or(0.0) + v);
            }
        }
        total
    }

    /// Total `cpus` scalar, the quantity the load ramp withholds from.
    pub fn cpus(&self) -> Option<f64> {
        self.scalar("cpus")
    }

    /// Merge assuming the one-kind-per-name invariant already holds.
    fn merge_unchecked(&mut self, resource: Resource) {
        if resource.value.is_empty() {
            return;
        }
        match self
            .resources
            .iter_mut()
            .find(|r| r.key() == resource.key() && r.value.kind() == resource.value.kind())
        {
            Some(existing) => existing.value.merge(&resource.value),
            None => self.resources.push(resource),
        }
    }
}

/// Multiset equality: order of insertion is irrelevant.
impl PartialEq for ResourceSet {
    fn eq(&self, other: &Self) -> bool {
        self.resources.len() == other.resources.len()
            && self
                .resources
                .iter()
                .all(|r| other.resources.iter().any(|o| o == r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revocable_cpus(v: f64) -> Resource {
        Resource::scalar("cpus", v).as_revocable()
    }

    #[test]
    fn same_key_quantities_merge_on_add() {
        let mut set = ResourceSet::new();
        set.add(revocable_cpus(1.5)).unwrap();
        set.add(revocable_cpus(2.5)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.cpus(), Some(4.0));
    }

    #[test]
    fn tags_keep_quantities_apart() {
        let mut set = ResourceSet::new();
        set.add(Resource::scalar("cpus", 2.0)).unwrap();
        set.add(revocable_cpus(1.0)).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.cpus(), Some(3.0));
        assert_eq!(set.revocable().cpus(), Some(1.0));
    }

    #[test]
    fn kind_redeclaration_is_rejected() {
        let mut set = ResourceSet::new();
        set.add(Resource::scalar("ports", 4.0)).unwrap();
        let err = set.add(Resource::ranges("ports", vec![(1, 10)]));
        assert!(matches!(err, Err(ResourceError::KindConflict { .. })));
    }

    #[test]
    fn subtraction_saturates_and_drops_empty() {
        let mut set = ResourceSet::new();
        set.add(revocable_cpus(2.0)).unwrap();
        let result = set.saturating_sub(&ResourceSet::of(revocable_cpus(5.0)));
        assert!(result.is_empty());
    }

    #[test]
    fn subtraction_ignores_unmatched_keys() {
        let mut set = ResourceSet::new();
        set.add(revocable_cpus(2.0)).unwrap();
        // Guaranteed cpus have a different key; nothing is removed.
        let result = set.saturating_sub(&ResourceSet::of(Resource::scalar("cpus", 1.0)));
        assert_eq!(result.cpus(), Some(2.0));
    }

    #[test]
    fn unallocate_merges_collisions() {
        let mut set = ResourceSet::new();
        set.add(revocable_cpus(1.0).allocated_to("exec-1")).unwrap();
        set.add(revocable_cpus(2.0).allocated_to("exec-2")).unwrap();
        assert_eq!(set.len(), 2);

        let stripped = set.unallocate();
        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped.cpus(), Some(3.0));
        assert!(stripped.iter().all(|r| r.allocation.is_none()));
    }

    #[test]
    fn as_revocable_retags_everything() {
        let mut set = ResourceSet::new();
        set.add(Resource::scalar("cpus", 4.0)).unwrap();
        set.add(Resource::scalar("mem", 2048.0)).unwrap();
        let revocable = set.as_revocable();
        assert!(revocable.iter().all(|r| r.revocable));
        assert_eq!(revocable, revocable.revocable());
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = ResourceSet::new();
        a.add(Resource::scalar("cpus", 4.0)).unwrap();
        a.add(Resource::scalar("mem", 2048.0)).unwrap();

        let mut b = ResourceSet::new();
        b.add(Resource::scalar("mem", 2048.0)).unwrap();
        b.add(Resource::scalar("cpus", 4.0)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn zero_valued_quantities_are_not_stored() {
        let set = ResourceSet::of(revocable_cpus(0.0));
        assert!(set.is_empty());
    }

    #[test]
    fn survives_a_serde_round_trip() {
        let mut set = ResourceSet::new();
        set.add(revocable_cpus(2.5).allocated_to("exec-1")).unwrap();
        set.add(Resource::ranges("ports", vec![(31000, 32000)]))
            .unwrap();
        set.add(Resource::scalar("mem", 2048.0)).unwrap();

        let json = serde_json::to_string(&set).unwrap();
        let decoded: ResourceSet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, set);
        assert_eq!(decoded.revocable().cpus(), Some(2.5));
    }
}
