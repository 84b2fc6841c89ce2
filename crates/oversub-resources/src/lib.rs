//! oversub-resources — the resource algebra for node-level oversubscription.
//!
//! Represents named, typed quantities (`cpus`, `mem`, port ranges, disk
//! sets) tagged as revocable or guaranteed, and collections of them closed
//! under addition and saturating subtraction. Quantities observed in usage
//! snapshots additionally carry allocation bookkeeping, which can be
//! stripped (`unallocate`) so they become comparable against configured
//! totals.
//!
//! # Components
//!
//! - **`value`** — scalar / range / set quantity values
//! - **`resource`** — a single tagged quantity
//! - **`set`** — the `(name, tag, allocation)`-keyed multiset
//! - **`parse`** — `"cpus:4;mem:2048"` spec-string parsing

pub mod error;
pub mod parse;
pub mod resource;
pub mod set;
pub mod value;

pub use error::{ResourceError, ResourceResult};
pub use resource::Resource;
pub use set::ResourceSet;
pub use value::Value;
