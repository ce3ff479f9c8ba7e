use crate::error::SetupError;
use crate::logic::dependency_graph::DependencyGraph;
use crate::logic::permissions::GrantStatements;
use crate::model::{EnsureTenantSchemaRequest, SchemaType, ServiceId, Tenant, TenantSchemaReport};
use crate::registry::Registry;
use crate::seed;
use crate::store::traits::Store;

/// Runs the schema setup passes against a store.
///
/// Holds only shared references, so one registry and grant list can back any
/// number of concurrent bootstraps.
pub struct SchemaBootstrapper<'a, S: ?Sized> {
    store: &'a S,
    registry: &'a Registry,
    grants: &'a GrantStatements,
}

impl<'a, S: Store + ?Sized> SchemaBootstrapper<'a, S> {
    pub fn new(store: &'a S, registry: &'a Registry, grants: &'a GrantStatements) -> Self {
        Self {
            store,
            registry,
            grants,
        }
    }

    /// Create or re-verify a tenant schema.
    ///
    /// Order: validate the id, create the schema, provision every
    /// tenant-specific table in dependency order, apply grants, register the
    /// tenant, then seed defaults for a tenant created by this call. Any failure
    /// aborts the rest. The tenant row is only written once the schema is fully
    /// provisioned, so a failed call leaves the tenant unregistered and a retry
    /// still seeds it.
    pub async fn ensure_tenant_schema(
        &self,
        request: &EnsureTenantSchemaRequest,
    ) -> Result<TenantSchemaReport, SetupError> {
        Tenant::validate_id(&request.tenant_id)?;
        let tenant_id = request.tenant_id.as_str();

        let exists = match self.store.get_tenant(tenant_id).await? {
            Some(_) if request.create_only => {
                log::warn!("[{}] Tenant already exists; refusing create-only bootstrap", tenant_id);
                return Err(SetupError::AlreadyExists(tenant_id.to_string()));
            }
            Some(_) => {
                log::info!("[{}] Tenant already exists; re-verifying schema", tenant_id);
                true
            }
            None => false,
        };

        self.store.ensure_schema_existence(tenant_id).await?;
        log::info!("[{}] Schema ensured", tenant_id);

        let graph = DependencyGraph::build(self.registry.descriptors());
        log::info!(
            "[{}] Provisioning tables across {} requirement set(s)",
            tenant_id,
            graph.len()
        );
        let provisioned = graph.visit(self.store, tenant_id).await?;
        log::info!("[{}] Ensured {} table manager(s)", tenant_id, provisioned.len());

        self.grants.apply(self.store, tenant_id).await?;

        let newly_created = !exists && self.register_tenant(request).await?;

        let seeded = newly_created && !request.create_only;
        if seeded {
            seed::seed_tenant_defaults(self.store, request).await?;
            log::info!("[{}] Default data seeded", tenant_id);
        }

        Ok(TenantSchemaReport {
            tenant_id: tenant_id.to_string(),
            newly_created,
            seeded,
            provisioned,
        })
    }

    /// Insert the tenant row. Returns whether this call created it.
    async fn register_tenant(&self, request: &EnsureTenantSchemaRequest) -> Result<bool, SetupError> {
        let tenant_id = request.tenant_id.as_str();
        let tenant_name = match request.tenant_name.trim() {
            "" => tenant_id,
            name => name,
        };

        let inserted = self
            .store
            .insert_tenant(Tenant::new(tenant_id.to_string(), tenant_name.to_string()))
            .await?;
        if inserted {
            log::info!("[{}] Created tenant '{}'", tenant_id, tenant_name);
        } else if request.create_only {
            // Lost a race against a concurrent bootstrap of the same id
            return Err(SetupError::AlreadyExists(tenant_id.to_string()));
        }
        Ok(inserted)
    }

    /// Provision the `_levelops` inventory schema and its tables in registry order
    pub async fn ensure_internal_schema(&self) -> Result<Vec<ServiceId>, SetupError> {
        self.ensure_fixed_schema(SchemaType::LevelopsInventorySchema).await
    }

    /// Provision the global tables (tenant registry) in registry order
    pub async fn ensure_global_schema(&self) -> Result<Vec<ServiceId>, SetupError> {
        self.ensure_fixed_schema(SchemaType::Global).await
    }

    async fn ensure_fixed_schema(&self, schema_type: SchemaType) -> Result<Vec<ServiceId>, SetupError> {
        if let Some(schema) = schema_type.fixed_schema_name() {
            self.store.ensure_schema_existence(schema).await?;
        }

        let mut provisioned = Vec::new();
        for descriptor in self.registry.with_schema_type(schema_type) {
            let schema = descriptor.schema_for(None)?;
            self.store.ensure_table_existence(schema, descriptor).await?;
            provisioned.push(descriptor.id);
        }

        log::info!("Ensured {} {:?} table manager(s)", provisioned.len(), schema_type);
        Ok(provisioned)
    }
}
