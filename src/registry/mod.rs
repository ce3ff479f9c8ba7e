//! Static registry of the table managers provisioned by the setup endpoints.
//!
//! The registry is built once at startup and shared read-only between
//! concurrent bootstrap calls.

pub mod cicd;
pub mod global;
pub mod org;
pub mod platform;
pub mod scm;

use std::collections::BTreeSet;

use crate::model::{SchemaType, ServiceId, TableDescriptor};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<TableDescriptor>,
}

impl Registry {
    pub fn new(descriptors: Vec<TableDescriptor>) -> Self {
        Self { descriptors }
    }

    /// The LevelOps table managers, global ones first
    pub fn levelops() -> Self {
        let descriptors = [
            global::DESCRIPTORS,
            platform::DESCRIPTORS,
            scm::DESCRIPTORS,
            cicd::DESCRIPTORS,
            org::DESCRIPTORS,
        ]
        .concat();
        Self::new(descriptors)
    }

    pub fn descriptors(&self) -> &[TableDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, id: ServiceId) -> Option<&TableDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn with_schema_type(&self, schema_type: SchemaType) -> impl Iterator<Item = &TableDescriptor> {
        self.descriptors
            .iter()
            .filter(move |d| d.schema_type == schema_type)
    }

    /// `(descriptor, reference)` pairs whose reference is not registered.
    /// These can never be satisfied and will stall the dependency graph.
    pub fn unresolved_references(&self) -> Vec<(ServiceId, ServiceId)> {
        let known: BTreeSet<ServiceId> = self.descriptors.iter().map(|d| d.id).collect();
        self.descriptors
            .iter()
            .flat_map(|d| d.references.iter().map(move |r| (d.id, *r)))
            .filter(|(_, reference)| !known.contains(reference))
            .collect()
    }

    /// Ids registered more than once
    pub fn duplicate_ids(&self) -> Vec<ServiceId> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for descriptor in &self.descriptors {
            if !seen.insert(descriptor.id) {
                duplicates.insert(descriptor.id);
            }
        }
        duplicates.into_iter().collect()
    }
}
