use crate::model::{AdminUser, TableDescriptor, Tenant};
use anyhow::Result;

/// Global tenant registry
#[async_trait::async_trait]
pub trait TenantStore: Send + Sync {
    async fn get_tenant(&self, id: &str) -> Result<Option<Tenant>>;
    async fn list_tenants(&self) -> Result<Vec<Tenant>>;
    /// Returns false when a tenant with the same id already exists
    async fn insert_tenant(&self, tenant: Tenant) -> Result<bool>;
}

/// DDL execution. Every operation must be idempotent so a failed bootstrap
/// can simply be re-run.
#[async_trait::async_trait]
pub trait SchemaStore: Send + Sync {
    async fn ensure_schema_existence(&self, schema: &str) -> Result<()>;
    /// Create the descriptor's tables in `schema` if they are missing
    async fn ensure_table_existence(&self, schema: &str, descriptor: &TableDescriptor) -> Result<()>;
    /// Execute a single raw statement (grants, role creation)
    async fn execute_statement(&self, sql: &str) -> Result<()>;
}

/// Default rows written into a freshly created tenant schema
#[async_trait::async_trait]
pub trait SeedStore: Send + Sync {
    /// Returns false when a user with the same email already exists
    async fn insert_admin_user(&self, schema: &str, user: &AdminUser) -> Result<bool>;
    async fn upsert_tenant_config(&self, schema: &str, name: &str, value: &str) -> Result<()>;
}

pub trait Store: TenantStore + SchemaStore + SeedStore + Send + Sync {}
