use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{SetupError, UnresolvedRequirement};
use crate::logic::{DependencyGraph, GrantStatements, SchemaBootstrapper};
use crate::model::{DefaultUser, EnsureTenantSchemaRequest, ServiceId, Tenant, TenantSchemaReport};
use crate::registry::Registry;
use crate::store::traits::Store;

/// Shared handler state: the store plus the read-only registry and grant list
pub struct AppState<S> {
    pub store: Arc<S>,
    pub registry: Arc<Registry>,
    pub grants: Arc<GrantStatements>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            grants: Arc::clone(&self.grants),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: Arc<S>, registry: Registry, grants: GrantStatements) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            grants: Arc::new(grants),
        }
    }

    fn bootstrapper(&self) -> SchemaBootstrapper<'_, S> {
        SchemaBootstrapper::new(self.store.as_ref(), &self.registry, &self.grants)
    }
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Vec<UnresolvedRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visited: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            remaining: None,
            visited: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<SetupError> for ErrorResponse {
    fn from(err: SetupError) -> Self {
        let message = err.to_string();
        match err {
            SetupError::DependencyGraph { remaining, visited } => Self {
                error: message,
                remaining: Some(remaining),
                visited: Some(visited),
            },
            _ => Self::new(&message),
        }
    }
}

fn setup_error(err: SetupError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        log::error!("Schema setup failed: {:#}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::from(err)))
}

fn internal_error(err: anyhow::Error) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&err.to_string())),
    )
}

/// Records/count envelope used by list endpoints
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub records: Vec<T>,
    pub count: usize,
    #[serde(rename = "_metadata")]
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct PageMetadata {
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
    pub total_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct EnsureTenantSchemaQuery {
    pub company: Option<String>,
    pub company_name: Option<String>,
    pub default_user_name: Option<String>,
    pub default_user_lastname: Option<String>,
    pub default_user_email: Option<String>,
    pub create_only: Option<bool>,
}

impl EnsureTenantSchemaQuery {
    fn into_request(self) -> Result<EnsureTenantSchemaRequest, SetupError> {
        let company = self
            .company
            .ok_or_else(|| SetupError::InvalidArgument("company is required".to_string()))?;
        let tenant_name = self.company_name.unwrap_or_else(|| company.clone());
        Ok(EnsureTenantSchemaRequest::new(company, tenant_name)
            .with_default_user(DefaultUser {
                first_name: self.default_user_name,
                last_name: self.default_user_lastname,
                email: self.default_user_email,
            })
            .create_only(self.create_only.unwrap_or(false)))
    }
}

#[derive(Debug, Serialize)]
pub struct SchemaPassResponse {
    pub schema: String,
    pub provisioned: Vec<ServiceId>,
}

#[derive(Debug, Serialize)]
pub struct DependencyGraphResponse {
    pub requirement_sets: Vec<UnresolvedRequirement>,
    pub count: usize,
}

pub async fn ensure_tenant_schema<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<EnsureTenantSchemaQuery>,
) -> Result<Json<TenantSchemaReport>, ApiError> {
    let request = query.into_request().map_err(setup_error)?;
    log::info!(
        "[{}] Ensure tenant schema requested (create_only={})",
        request.tenant_id,
        request.create_only
    );

    state
        .bootstrapper()
        .ensure_tenant_schema(&request)
        .await
        .map(Json)
        .map_err(setup_error)
}

pub async fn ensure_levelops_schema<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<SchemaPassResponse>, ApiError> {
    let provisioned = state
        .bootstrapper()
        .ensure_internal_schema()
        .await
        .map_err(setup_error)?;

    Ok(Json(SchemaPassResponse {
        schema: crate::model::LEVELOPS_INVENTORY_SCHEMA.to_string(),
        provisioned,
    }))
}

pub async fn ensure_global_schema<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<SchemaPassResponse>, ApiError> {
    let provisioned = state
        .bootstrapper()
        .ensure_global_schema()
        .await
        .map_err(setup_error)?;

    Ok(Json(SchemaPassResponse {
        schema: crate::model::GLOBAL_SCHEMA.to_string(),
        provisioned,
    }))
}

pub async fn list_tenants<S: Store>(
    State(state): State<AppState<S>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListResponse<Tenant>>, ApiError> {
    let tenants = state.store.list_tenants().await.map_err(internal_error)?;

    let page_size = page.page_size.unwrap_or(100).max(1);
    let page_number = page.page.unwrap_or(0);
    let total_count = tenants.len();
    let records: Vec<Tenant> = tenants
        .into_iter()
        .skip(page_number.saturating_mul(page_size))
        .take(page_size)
        .collect();
    let has_next = page_number.saturating_add(1).saturating_mul(page_size) < total_count;

    Ok(Json(ListResponse {
        count: records.len(),
        records,
        metadata: PageMetadata {
            page: page_number,
            page_size,
            has_next,
            total_count,
        },
    }))
}

pub async fn get_tenant<S: Store>(
    State(state): State<AppState<S>>,
    Path(tenant_id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    match state.store.get_tenant(&tenant_id).await {
        Ok(Some(tenant)) => Ok(Json(tenant)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Tenant not found")),
        )),
        Err(e) => Err(internal_error(e)),
    }
}

/// Tenant-specific requirement sets and the table managers waiting on each
pub async fn get_dependency_graph<S: Store>(
    State(state): State<AppState<S>>,
) -> Json<DependencyGraphResponse> {
    let requirement_sets = DependencyGraph::build(state.registry.descriptors()).summary();
    Json(DependencyGraphResponse {
        count: requirement_sets.len(),
        requirement_sets,
    })
}
