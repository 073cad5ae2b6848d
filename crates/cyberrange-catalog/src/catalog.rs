//! The catalog itself: a lookup table over [`TechniqueDescriptor`] entries.

use std::collections::HashMap;

use cyberrange_types::TechniqueDescriptor;
use thiserror::Error;
use tracing::debug;

use crate::builtin;

/// Errors raised while building or querying a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two entries share an `id`; the catalog requires uniqueness.
    #[error("duplicate technique id: {0}")]
    DuplicateId(String),
}

/// An immutable collection of [`TechniqueDescriptor`] entries, keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    techniques: HashMap<String, TechniqueDescriptor>,
}

impl Catalog {
    /// Builds a catalog from an arbitrary set of descriptors, rejecting
    /// duplicate ids.
    pub fn new(techniques: Vec<TechniqueDescriptor>) -> Result<Self, CatalogError> {
        let mut map = HashMap::with_capacity(techniques.len());
        for technique in techniques {
            if map.contains_key(&technique.id) {
                return Err(CatalogError::DuplicateId(technique.id));
            }
            map.insert(technique.id.clone(), technique);
        }
        Ok(Self { techniques: map })
    }

    /// The catalog shipped with the range: prompt injection, jailbreak,
    /// command execution, SQL injection (classic/blind/union), exfiltration,
    /// auth bypass, and denial of service.
    pub fn builtin() -> Self {
        let techniques = builtin::all();
        debug!(count = techniques.len(), "loaded builtin technique catalog");
        Self::new(techniques).expect("builtin catalog has unique ids")
    }

    /// Looks up a technique by id.
    pub fn get(&self, id: &str) -> Option<&TechniqueDescriptor> {
        self.techniques.get(id)
    }

    /// All entries in the catalog, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &TechniqueDescriptor> {
        self.techniques.values()
    }

    /// Number of entries in the catalog.
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }
}
