pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod registry;
pub mod seed;
pub mod store;

use anyhow::Context;
use std::sync::Arc;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{SetupError, UnresolvedRequirement};
pub use logic::{DependencyGraph, GrantStatements, SchemaBootstrapper};
pub use model::*;
pub use registry::Registry;
pub use store::{MemoryStore, PostgresStore, Store};

/// Build the router over `store`, running the startup schema passes the
/// configuration asks for first.
pub async fn prepare_app<S: Store + 'static>(
    store: Arc<S>,
    config: &crate::config::AppConfig,
) -> anyhow::Result<axum::Router> {
    let registry = Registry::levelops();
    for (descriptor, reference) in registry.unresolved_references() {
        log::warn!(
            "Table manager '{}' references unregistered '{}'; tenant bootstraps will fail",
            descriptor,
            reference
        );
    }
    for id in registry.duplicate_ids() {
        log::warn!("Table manager '{}' is registered more than once", id);
    }

    let grants = config
        .grant_statements()
        .context("Invalid setup.grant_statements")?;

    let bootstrapper = SchemaBootstrapper::new(store.as_ref(), &registry, &grants);
    if config.setup.ensure_global_schema_on_startup {
        bootstrapper
            .ensure_global_schema()
            .await
            .context("Failed to ensure global schema")?;
    }
    if config.setup.ensure_internal_schema_on_startup {
        bootstrapper
            .ensure_internal_schema()
            .await
            .context("Failed to ensure internal schema")?;
    }

    let state = api::AppState::new(store, registry, grants);
    Ok(routes::create_router().with_state(state))
}
