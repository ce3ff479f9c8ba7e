use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::error::{SetupError, UnresolvedRequirement};
use crate::model::{ServiceId, TableDescriptor};
use crate::store::traits::SchemaStore;

/// Set of table managers that must be provisioned before a dependent one
pub type RequirementSet = BTreeSet<ServiceId>;

/// Tenant-specific table managers grouped by their exact requirement set.
///
/// Built fresh for every bootstrap and consumed by [`DependencyGraph::visit`],
/// so concurrent bootstraps never share graph state.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph<'r> {
    entries: BTreeMap<RequirementSet, Vec<&'r TableDescriptor>>,
}

impl<'r> DependencyGraph<'r> {
    /// Group every tenant-specific descriptor under its own requirement set.
    /// Global and inventory descriptors are provisioned by separate passes and
    /// never enter the graph.
    pub fn build(descriptors: &'r [TableDescriptor]) -> Self {
        let mut entries: BTreeMap<RequirementSet, Vec<&'r TableDescriptor>> = BTreeMap::new();
        for descriptor in descriptors.iter().filter(|d| d.is_tenant_specific()) {
            entries
                .entry(descriptor.requirements())
                .or_default()
                .push(descriptor);
        }
        Self { entries }
    }

    /// Number of distinct requirement sets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, requirements: &RequirementSet) -> Option<&[&'r TableDescriptor]> {
        self.entries.get(requirements).map(Vec::as_slice)
    }

    /// Printable `requires -> dependents` listing of the graph
    pub fn summary(&self) -> Vec<UnresolvedRequirement> {
        self.entries
            .iter()
            .map(|(requires, owners)| UnresolvedRequirement {
                requires: requires.iter().map(ServiceId::to_string).collect(),
                dependents: owners.iter().map(|d| d.id.to_string()).sorted().collect(),
            })
            .collect()
    }

    /// Drain the graph in dependency order, ensuring the tables of every owner
    /// inside `tenant_id`'s schema.
    ///
    /// Returns the owners in the order they were provisioned. A pass that adds
    /// nothing to the visited set means a cycle or a dangling reference, which
    /// fails with [`SetupError::DependencyGraph`].
    pub async fn visit<S: SchemaStore + ?Sized>(
        mut self,
        store: &S,
        tenant_id: &str,
    ) -> Result<Vec<ServiceId>, SetupError> {
        let mut visited = BTreeSet::new();
        let mut provisioned = Vec::new();

        if let Some(owners) = self.entries.remove(&RequirementSet::new()) {
            ensure_owners(store, tenant_id, &owners, &mut visited, &mut provisioned).await?;
        }

        while !self.entries.is_empty() {
            let before = visited.len();
            let keys: Vec<RequirementSet> = self.entries.keys().cloned().collect();

            for requirements in keys {
                if !requirements.is_subset(&visited) {
                    continue;
                }
                if let Some(owners) = self.entries.remove(&requirements) {
                    ensure_owners(store, tenant_id, &owners, &mut visited, &mut provisioned).await?;
                }
            }

            if visited.len() == before {
                let remaining = self.summary();
                let visited: Vec<String> = visited.iter().map(ServiceId::to_string).collect();
                log::error!(
                    "[{}] Dependency graph cannot make progress: {} requirement set(s) unresolved, visited [{}]",
                    tenant_id,
                    remaining.len(),
                    visited.join(", ")
                );
                return Err(SetupError::DependencyGraph { remaining, visited });
            }
        }

        Ok(provisioned)
    }
}

async fn ensure_owners<S: SchemaStore + ?Sized>(
    store: &S,
    tenant_id: &str,
    owners: &[&TableDescriptor],
    visited: &mut BTreeSet<ServiceId>,
    provisioned: &mut Vec<ServiceId>,
) -> Result<(), SetupError> {
    for descriptor in owners {
        let schema = descriptor.schema_for(Some(tenant_id))?;
        log::debug!("[{}] Ensuring tables of '{}'", tenant_id, descriptor.id);
        store.ensure_table_existence(schema, descriptor).await?;
        visited.insert(descriptor.id);
        provisioned.push(descriptor.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::store::MemoryStore;

    const A: ServiceId = ServiceId::new("service_a");
    const B: ServiceId = ServiceId::new("service_b");
    const C: ServiceId = ServiceId::new("service_c");
    const MISSING: ServiceId = ServiceId::new("missing");

    async fn store_with_schema(schema: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.ensure_schema_existence(schema).await.unwrap();
        store
    }

    #[test]
    fn test_build_groups_owners_by_requirement_set() {
        let descriptors = [
            TableDescriptor::tenant(A, &[], &[]),
            TableDescriptor::tenant(B, &[A], &[]),
            TableDescriptor::tenant(C, &[A], &[]),
            TableDescriptor::global(MISSING, &[]),
        ];

        let graph = DependencyGraph::build(&descriptors);

        assert_eq!(graph.len(), 2);
        let root: Vec<ServiceId> = graph.get(&RequirementSet::new()).unwrap().iter().map(|d| d.id).collect();
        assert_eq!(root, vec![A]);
        let on_a: Vec<ServiceId> = graph.get(&RequirementSet::from([A])).unwrap().iter().map(|d| d.id).collect();
        assert_eq!(on_a, vec![B, C]);
    }

    #[tokio::test]
    async fn test_visit_follows_dependency_order() {
        let descriptors = [
            TableDescriptor::tenant(C, &[A, B], &[]),
            TableDescriptor::tenant(B, &[A], &[]),
            TableDescriptor::tenant(A, &[], &[]),
        ];
        let store = store_with_schema("acme").await;

        let provisioned = DependencyGraph::build(&descriptors)
            .visit(&store, "acme")
            .await
            .unwrap();

        assert_eq!(provisioned, vec![A, B, C]);
        assert_eq!(store.ensure_calls_for("acme"), vec![A, B, C]);
    }

    #[tokio::test]
    async fn test_cycle_is_reported_instead_of_looping() {
        let descriptors = [
            TableDescriptor::tenant(A, &[B], &[]),
            TableDescriptor::tenant(B, &[A], &[]),
        ];
        let store = store_with_schema("acme").await;

        let err = DependencyGraph::build(&descriptors)
            .visit(&store, "acme")
            .await
            .unwrap_err();

        match err {
            SetupError::DependencyGraph { remaining, visited } => {
                assert_eq!(remaining.len(), 2);
                assert!(visited.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.ensure_calls().is_empty());
    }

    #[tokio::test]
    async fn test_dangling_reference_is_reported() {
        let descriptors = [
            TableDescriptor::tenant(A, &[], &[]),
            TableDescriptor::tenant(B, &[MISSING], &[]),
        ];
        let store = store_with_schema("acme").await;

        let err = DependencyGraph::build(&descriptors)
            .visit(&store, "acme")
            .await
            .unwrap_err();

        match err {
            SetupError::DependencyGraph { remaining, visited } => {
                assert_eq!(
                    remaining,
                    vec![UnresolvedRequirement {
                        requires: vec!["missing".to_string()],
                        dependents: vec!["service_b".to_string()],
                    }]
                );
                assert_eq!(visited, vec!["service_a".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.ensure_calls_for("acme"), vec![A]);
    }

    #[tokio::test]
    async fn test_empty_graph_visits_nothing() {
        let store = store_with_schema("acme").await;
        let provisioned = DependencyGraph::build(&[]).visit(&store, "acme").await.unwrap();
        assert!(provisioned.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_aborts_the_visit() {
        let descriptors = [
            TableDescriptor::tenant(A, &[], &[]),
            TableDescriptor::tenant(B, &[A], &[]),
            TableDescriptor::tenant(C, &[B], &[]),
        ];
        let store = store_with_schema("acme").await;
        store.fail_table(B);

        let err = DependencyGraph::build(&descriptors)
            .visit(&store, "acme")
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::Sql(_)));
        assert_eq!(store.ensure_calls_for("acme"), vec![A]);
    }

    #[tokio::test]
    async fn test_levelops_registry_is_provisioned_completely_and_in_order() {
        let registry = Registry::levelops();
        let store = store_with_schema("acme").await;

        let provisioned = DependencyGraph::build(registry.descriptors())
            .visit(&store, "acme")
            .await
            .unwrap();

        let tenant_specific: BTreeSet<ServiceId> = registry
            .descriptors()
            .iter()
            .filter(|d| d.is_tenant_specific())
            .map(|d| d.id)
            .collect();
        assert_eq!(provisioned.len(), tenant_specific.len());
        assert_eq!(provisioned.iter().copied().collect::<BTreeSet<_>>(), tenant_specific);

        let position = |id: ServiceId| provisioned.iter().position(|p| *p == id).unwrap();
        for descriptor in registry.descriptors().iter().filter(|d| d.is_tenant_specific()) {
            for reference in descriptor.references {
                assert!(
                    position(*reference) < position(descriptor.id),
                    "{} provisioned before its requirement {}",
                    descriptor.id,
                    reference
                );
            }
        }
    }
}
