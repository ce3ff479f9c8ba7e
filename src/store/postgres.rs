use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, Executor, PgPool, Row};

use crate::model::{quote_ident, AdminUser, TableDescriptor, Tenant, GLOBAL_SCHEMA};
use crate::store::traits::{SchemaStore, SeedStore, Store, TenantStore};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Install the extensions the table DDL relies on
    pub async fn migrate(&self) -> Result<()> {
        self.pool
            .execute(r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#)
            .await
            .context("Failed to create uuid-ossp extension")?;
        Ok(())
    }
}

fn tenant_from_row(row: &sqlx::postgres::PgRow) -> Tenant {
    Tenant {
        id: row.get("id"),
        tenant_name: row.get("tenantname"),
        created_at: row.get("createdat"),
    }
}

#[async_trait::async_trait]
impl TenantStore for PostgresStore {
    async fn get_tenant(&self, id: &str) -> Result<Option<Tenant>> {
        let sql = format!(
            "SELECT id, tenantname, createdat FROM {}.tenants WHERE id = $1",
            quote_ident(GLOBAL_SCHEMA)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch tenant")?;

        Ok(row.as_ref().map(tenant_from_row))
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let sql = format!(
            "SELECT id, tenantname, createdat FROM {}.tenants ORDER BY createdat, id",
            quote_ident(GLOBAL_SCHEMA)
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tenants")?;

        Ok(rows.iter().map(tenant_from_row).collect())
    }

    async fn insert_tenant(&self, tenant: Tenant) -> Result<bool> {
        let sql = format!(
            r#"
            INSERT INTO {}.tenants (id, tenantname, createdat)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
            quote_ident(GLOBAL_SCHEMA)
        );
        let result = sqlx::query(&sql)
            .bind(&tenant.id)
            .bind(&tenant.tenant_name)
            .bind(tenant.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to insert tenant")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl SchemaStore for PostgresStore {
    async fn ensure_schema_existence(&self, schema: &str) -> Result<()> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema));
        self.pool
            .execute(sql.as_str())
            .await
            .with_context(|| format!("Failed to create schema '{}'", schema))?;
        Ok(())
    }

    async fn ensure_table_existence(&self, schema: &str, descriptor: &TableDescriptor) -> Result<()> {
        // Simple query protocol, so DO $$ ... $$ blocks run unchanged
        for statement in descriptor.render_ddl(schema) {
            self.pool.execute(statement.as_str()).await.with_context(|| {
                format!("Failed to ensure tables of '{}' in schema '{}'", descriptor.id, schema)
            })?;
        }
        Ok(())
    }

    async fn execute_statement(&self, sql: &str) -> Result<()> {
        self.pool
            .execute(sql)
            .await
            .with_context(|| format!("Failed to execute statement: {}", sql))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SeedStore for PostgresStore {
    async fn insert_admin_user(&self, schema: &str, user: &AdminUser) -> Result<bool> {
        let sql = format!(
            r#"
            INSERT INTO {}.users (email, bcryptpassword, firstname, lastname, passwordreset,
                                  usertype, samlauthenabled, passwordauthenabled)
            VALUES ($1, ''::bytea, $2, $3, '{{}}'::jsonb, 'ADMIN', false, true)
            ON CONFLICT (email) DO NOTHING
            "#,
            quote_ident(schema)
        );
        let result = sqlx::query(&sql)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .execute(&self.pool)
            .await
            .context("Failed to insert admin user")?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_tenant_config(&self, schema: &str, name: &str, value: &str) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO {}.tenant_configs (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value
            "#,
            quote_ident(schema)
        );
        sqlx::query(&sql)
            .bind(name)
            .bind(value)
            .execute(&self.pool)
            .await
            .context("Failed to upsert tenant config")?;

        Ok(())
    }
}

impl Store for PostgresStore {}
