// File: services/vetclinic_backend/tests/app_tests.rs
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vetclinic_backend::build_router;
use vetclinic_config::load_config_from_str;
use vetclinic_db::{schema, DbClient};

const CONFIG: &str = r#"
server:
  host: 127.0.0.1
  port: 0
  environment: development
use_stripe: false
database:
  url: "sqlite::memory:"
billing:
  free_plan:
    max_specialties: 5
"#;

async fn app() -> Router {
    let config = Arc::new(load_config_from_str(CONFIG).unwrap());
    let db = DbClient::new(&config).await.unwrap();
    schema::init_schema(&db).await.unwrap();
    build_router(config, db)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_reports_database_status() {
    let app = app().await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "database": "ok"}));
}

#[tokio::test]
async fn test_feature_routes_are_nested_under_v1() {
    let app = app().await;

    let create = Request::builder()
        .method("POST")
        .uri("/v1/specialties")
        .header("x-tenant-id", "9")
        .header("x-user-permissions", "*")
        .header("content-type", "application/json")
        .body(Body::from(json!({"name": "Ophthalmology"}).to_string()))
        .unwrap();
    let (status, _) = send(&app, create).await;
    assert_eq!(status, StatusCode::CREATED);

    let limits = Request::builder()
        .uri("/v1/plan-limits")
        .header("x-tenant-id", "9")
        .header("x-user-permissions", "*")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, limits).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usage"]["specialties"], 1);
    assert_eq!(body["data"]["plan"]["limits"]["max_specialties"], 5);

    let audit = Request::builder()
        .uri("/v1/audit-logs")
        .header("x-tenant-id", "9")
        .header("x-user-permissions", "audit_logs.read")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, audit).await;
    assert_eq!(body["data"][0]["action"], "specialty.created");

    let unprefixed = Request::builder()
        .uri("/specialties")
        .header("x-tenant-id", "9")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, unprefixed).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_tenant_is_unauthenticated() {
    let app = app().await;
    let request = Request::builder().uri("/v1/stats").body(Body::empty()).unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}
