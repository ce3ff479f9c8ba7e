use std::collections::{BTreeMap, BTreeSet};

use anyhow::{anyhow, Result};
use parking_lot::Mutex;

use crate::model::{AdminUser, ServiceId, TableDescriptor, Tenant};
use crate::store::traits::{SchemaStore, SeedStore, Store, TenantStore};

/// In-process store that records every DDL call instead of executing it.
///
/// Used to dry-run bootstraps and as the store behind the API tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tenants: BTreeMap<String, Tenant>,
    schemas: BTreeSet<String>,
    tables: BTreeSet<(String, ServiceId)>,
    ensure_calls: Vec<(String, ServiceId)>,
    statements: Vec<String>,
    users: BTreeMap<String, Vec<AdminUser>>,
    configs: BTreeMap<(String, String), String>,
    failing_tables: BTreeSet<ServiceId>,
    failing_statements: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `ensure_table_existence` call for `id` fail
    pub fn fail_table(&self, id: ServiceId) {
        self.state.lock().failing_tables.insert(id);
    }

    /// Make every later `execute_statement` call whose SQL contains `pattern` fail
    pub fn fail_statement(&self, pattern: &str) {
        self.state.lock().failing_statements.push(pattern.to_string());
    }

    /// Drop every injected failure
    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.failing_tables.clear();
        state.failing_statements.clear();
    }

    /// Every `ensure_table_existence` call so far, in call order
    pub fn ensure_calls(&self) -> Vec<(String, ServiceId)> {
        self.state.lock().ensure_calls.clone()
    }

    /// Ensure calls made against one schema, in call order
    pub fn ensure_calls_for(&self, schema: &str) -> Vec<ServiceId> {
        self.state
            .lock()
            .ensure_calls
            .iter()
            .filter(|(s, _)| s == schema)
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn schemas(&self) -> BTreeSet<String> {
        self.state.lock().schemas.clone()
    }

    pub fn has_table(&self, schema: &str, id: ServiceId) -> bool {
        self.state.lock().tables.contains(&(schema.to_string(), id))
    }

    pub fn executed_statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    pub fn users(&self, schema: &str) -> Vec<AdminUser> {
        self.state.lock().users.get(schema).cloned().unwrap_or_default()
    }

    pub fn tenant_config(&self, schema: &str, name: &str) -> Option<String> {
        self.state
            .lock()
            .configs
            .get(&(schema.to_string(), name.to_string()))
            .cloned()
    }
}

#[async_trait::async_trait]
impl TenantStore for MemoryStore {
    async fn get_tenant(&self, id: &str) -> Result<Option<Tenant>> {
        Ok(self.state.lock().tenants.get(id).cloned())
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        Ok(self.state.lock().tenants.values().cloned().collect())
    }

    async fn insert_tenant(&self, tenant: Tenant) -> Result<bool> {
        let mut state = self.state.lock();
        if state.tenants.contains_key(&tenant.id) {
            return Ok(false);
        }
        state.tenants.insert(tenant.id.clone(), tenant);
        Ok(true)
    }
}

#[async_trait::async_trait]
impl SchemaStore for MemoryStore {
    async fn ensure_schema_existence(&self, schema: &str) -> Result<()> {
        self.state.lock().schemas.insert(schema.to_string());
        Ok(())
    }

    async fn ensure_table_existence(&self, schema: &str, descriptor: &TableDescriptor) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing_tables.contains(&descriptor.id) {
            return Err(anyhow!(
                "Failed to ensure tables of '{}' in schema '{}'",
                descriptor.id,
                schema
            ));
        }
        if !state.schemas.contains(schema) {
            return Err(anyhow!("schema \"{}\" does not exist", schema));
        }
        state.ensure_calls.push((schema.to_string(), descriptor.id));
        state.tables.insert((schema.to_string(), descriptor.id));
        Ok(())
    }

    async fn execute_statement(&self, sql: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing_statements.iter().any(|pattern| sql.contains(pattern.as_str())) {
            return Err(anyhow!("Failed to execute statement: {}", sql));
        }
        state.statements.push(sql.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl SeedStore for MemoryStore {
    async fn insert_admin_user(&self, schema: &str, user: &AdminUser) -> Result<bool> {
        let mut state = self.state.lock();
        let users = state.users.entry(schema.to_string()).or_default();
        if users.iter().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.push(user.clone());
        Ok(true)
    }

    async fn upsert_tenant_config(&self, schema: &str, name: &str, value: &str) -> Result<()> {
        self.state
            .lock()
            .configs
            .insert((schema.to_string(), name.to_string()), value.to_string());
        Ok(())
    }
}

impl Store for MemoryStore {}
