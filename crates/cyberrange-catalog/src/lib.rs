//! # Technique Catalog
//!
//! An in-memory catalog of MITRE-style attack techniques plus a scorer that
//! ranks catalog entries against a subject profile. The catalog is the
//! workspace's one piece of process-wide state: built once at startup and
//! never mutated afterward, exactly like `sentinel-registry`'s Merkle tree
//! is immutable between registrations, except here there is no persistence
//! layer at all, because the catalog is static data rather than a verified
//! record of externally-supplied schemas.
//!
//! New entries can be added to [`Catalog::builtin`] without touching the
//! selector: the scoring algorithm in [`selector`] only ever reads
//! [`cyberrange_types::TechniqueDescriptor`] fields.

mod builtin;
pub mod catalog;
pub mod selector;

pub use catalog::{Catalog, CatalogError};
pub use selector::select;
