//! Bootstrap a tenant schema directly against the configured database.

use anyhow::{Context, Result};
use clap::Parser;
use levelops_internal_api::config::AppConfig;
use levelops_internal_api::model::{DefaultUser, EnsureTenantSchemaRequest};
use levelops_internal_api::store::PostgresStore;
use levelops_internal_api::{Registry, SchemaBootstrapper};

/// Create or re-verify a tenant schema without going through the HTTP API
#[derive(Debug, Parser)]
#[command(name = "bootstrap-tenant")]
struct Cli {
    /// Tenant id, also used as the schema name (lowercase letters and digits)
    tenant_id: String,

    /// Display name stored in the tenant registry
    tenant_name: String,

    /// Fail if the tenant already exists, and skip seeding
    #[arg(long)]
    create_only: bool,

    /// Email of the admin user seeded into a new tenant
    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,
}

impl Cli {
    fn into_request(self) -> EnsureTenantSchemaRequest {
        EnsureTenantSchemaRequest::new(self.tenant_id, self.tenant_name)
            .with_default_user(DefaultUser {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            })
            .create_only(self.create_only)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let request = Cli::parse().into_request();

    dotenvy::dotenv().ok();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = AppConfig::load()?;
    let database_url = config.database_url()?;
    let store = PostgresStore::new(&database_url, config.max_connections()).await?;
    store.migrate().await?;
    println!("Connected to database. Bootstrapping tenant '{}'...", request.tenant_id);

    let registry = Registry::levelops();
    let grants = config.grant_statements()?;
    let bootstrapper = SchemaBootstrapper::new(&store, &registry, &grants);

    bootstrapper
        .ensure_global_schema()
        .await
        .context("Failed to ensure global schema")?;
    let report = bootstrapper.ensure_tenant_schema(&request).await?;

    println!(
        "Tenant '{}' ready: newly_created={}, seeded={}, {} table manager(s) ensured",
        report.tenant_id,
        report.newly_created,
        report.seeded,
        report.provisioned.len()
    );

    Ok(())
}
