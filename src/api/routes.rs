use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .nest("/internal/v1", internal_routes::<S>())
}

fn internal_routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Schema setup
        .route(
            "/_ensure_tenant_schema",
            post(handlers::ensure_tenant_schema::<S>),
        )
        .route(
            "/_ensure_levelops_schema",
            post(handlers::ensure_levelops_schema::<S>),
        )
        .route(
            "/_ensure_global_schema",
            post(handlers::ensure_global_schema::<S>),
        )
        .route(
            "/_dependency_graph",
            get(handlers::get_dependency_graph::<S>),
        )
        // Tenant registry
        .route("/tenants", get(handlers::list_tenants::<S>))
        .route("/tenants/:tenant_id", get(handlers::get_tenant::<S>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::logic::GrantStatements;
    use crate::model::{ServiceId, TableDescriptor};
    use crate::registry::Registry;
    use crate::store::MemoryStore;

    fn app_with(store: Arc<MemoryStore>, registry: Registry) -> Router {
        create_router().with_state(AppState::new(store, registry, GrantStatements::default()))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(MemoryStore::new()), Registry::levelops());
        let (status, body) = send(app, "GET", "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ensure_tenant_schema_reports_provisioning() {
        let store = Arc::new(MemoryStore::new());
        let registry = Registry::levelops();
        let expected = registry.descriptors().iter().filter(|d| d.is_tenant_specific()).count();
        let app = app_with(store.clone(), registry);

        let (status, body) = send(
            app,
            "POST",
            "/internal/v1/_ensure_tenant_schema?company=acme&company_name=Acme%20Corp&default_user_email=ops%40acme.io",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tenant_id"], "acme");
        assert_eq!(body["newly_created"], true);
        assert_eq!(body["seeded"], true);
        assert_eq!(body["provisioned"].as_array().unwrap().len(), expected);
        assert_eq!(store.users("acme")[0].email, "ops@acme.io");
    }

    #[tokio::test]
    async fn test_invalid_tenant_id_is_bad_request() {
        let app = app_with(Arc::new(MemoryStore::new()), Registry::levelops());
        let (status, body) = send(
            app,
            "POST",
            "/internal/v1/_ensure_tenant_schema?company=Test%23123",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid tenant id"));
    }

    #[tokio::test]
    async fn test_missing_company_is_bad_request_with_json_error() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone(), Registry::levelops());
        let (status, body) = send(
            app,
            "POST",
            "/internal/v1/_ensure_tenant_schema?company_name=Acme",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid argument: company is required");
        assert!(store.schemas().is_empty());
    }

    #[tokio::test]
    async fn test_create_only_existing_tenant_is_bad_request() {
        let store = Arc::new(MemoryStore::new());
        let first = app_with(store.clone(), Registry::levelops());
        let (status, _) = send(first, "POST", "/internal/v1/_ensure_tenant_schema?company=acme").await;
        assert_eq!(status, StatusCode::OK);

        let second = app_with(store, Registry::levelops());
        let (status, body) = send(
            second,
            "POST",
            "/internal/v1/_ensure_tenant_schema?company=acme&create_only=true",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Tenant 'acme' already exists");
    }

    #[tokio::test]
    async fn test_stalled_graph_is_server_error_with_diagnostics() {
        const A: ServiceId = ServiceId::new("a");
        const B: ServiceId = ServiceId::new("b");
        let registry = Registry::new(vec![
            TableDescriptor::tenant(A, &[B], &[]),
            TableDescriptor::tenant(B, &[A], &[]),
        ]);
        let app = app_with(Arc::new(MemoryStore::new()), registry);

        let (status, body) = send(app, "POST", "/internal/v1/_ensure_tenant_schema?company=acme").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["remaining"].as_array().unwrap().len(), 2);
        assert_eq!(body["visited"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_tenants_listing_and_lookup() {
        let store = Arc::new(MemoryStore::new());
        for company in ["acme", "globex"] {
            let app = app_with(store.clone(), Registry::levelops());
            let uri = format!("/internal/v1/_ensure_tenant_schema?company={}", company);
            let (status, _) = send(app, "POST", &uri).await;
            assert_eq!(status, StatusCode::OK);
        }

        let app = app_with(store.clone(), Registry::levelops());
        let (status, body) = send(app, "GET", "/internal/v1/tenants?page_size=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["_metadata"]["total_count"], 2);
        assert_eq!(body["_metadata"]["has_next"], true);

        let app = app_with(store.clone(), Registry::levelops());
        let (status, body) = send(app, "GET", "/internal/v1/tenants/globex").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tenant_name"], "globex");

        let app = app_with(store, Registry::levelops());
        let (status, body) = send(app, "GET", "/internal/v1/tenants/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Tenant not found");
    }

    #[tokio::test]
    async fn test_internal_schema_and_dependency_graph() {
        let store = Arc::new(MemoryStore::new());

        let app = app_with(store.clone(), Registry::levelops());
        let (status, body) = send(app, "POST", "/internal/v1/_ensure_levelops_schema").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schema"], "_levelops");
        assert_eq!(
            body["provisioned"],
            serde_json::json!(["industry_dev_productivity_report"])
        );

        let app = app_with(store, Registry::levelops());
        let (status, body) = send(app, "GET", "/internal/v1/_dependency_graph").await;
        assert_eq!(status, StatusCode::OK);
        let sets = body["requirement_sets"].as_array().unwrap();
        assert_eq!(sets[0]["requires"], serde_json::json!([]));
        assert_eq!(body["count"].as_u64().unwrap() as usize, sets.len());
    }
}
