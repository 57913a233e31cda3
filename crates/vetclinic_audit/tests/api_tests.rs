// --- File: crates/vetclinic_audit/tests/api_tests.rs ---
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use vetclinic_audit::routes;
use vetclinic_common::models::NewAuditLog;
use vetclinic_db::{schema, AuditLogRepository, DbClient, SqlAuditLogRepository};

async fn setup() -> (Router, SqlAuditLogRepository) {
    let db = DbClient::from_url("sqlite::memory:").await.unwrap();
    schema::init_schema(&db).await.unwrap();
    (routes(db.clone()), SqlAuditLogRepository::new(db))
}

fn entry(tenant_id: i64, action: &str, user_id: i64) -> NewAuditLog {
    NewAuditLog {
        tenant_id,
        user_id: Some(user_id),
        action: action.to_string(),
        entity_type: "specialty".to_string(),
        entity_id: Some(1),
        changes: Some(json!({"name": "Surgery"})),
        ip_address: None,
        user_agent: None,
    }
}

async fn get(app: &Router, uri: &str, tenant: Option<&str>, permissions: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).header("x-user-permissions", permissions);
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant-id", tenant);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_returns_tenant_entries_with_pagination() {
    let (app, repo) = setup().await;
    for _ in 0..3 {
        repo.record(entry(1, "specialty.created", 10)).await.unwrap();
    }
    repo.record(entry(1, "specialty.deleted", 11)).await.unwrap();
    repo.record(entry(2, "specialty.created", 10)).await.unwrap();

    let (status, body) = get(&app, "/audit-logs?limit=2", Some("1"), "audit_logs.read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["pagination"],
        json!({"total": 4, "limit": 2, "offset": 0, "has_more": true})
    );
    for log in body["data"].as_array().unwrap() {
        assert_eq!(log["tenant_id"], 1);
    }

    let (_, body) = get(
        &app,
        "/audit-logs?action=specialty.deleted&user_id=11",
        Some("1"),
        "audit_logs.read",
    )
    .await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["action"], "specialty.deleted");
}

#[tokio::test]
async fn test_limit_is_clamped_and_garbage_falls_back() {
    let (app, _repo) = setup().await;

    let (status, body) = get(&app, "/audit-logs?limit=100000", Some("1"), "audit_logs.read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["limit"], 500);

    let (_, body) = get(&app, "/audit-logs?limit=0&offset=-7", Some("1"), "audit_logs.read").await;
    assert_eq!(body["pagination"]["limit"], 1);
    assert_eq!(body["pagination"]["offset"], 0);

    let (_, body) = get(&app, "/audit-logs?limit=ten", Some("1"), "audit_logs.read").await;
    assert_eq!(body["pagination"]["limit"], 100);
}

#[tokio::test]
async fn test_invalid_timestamp_filter_is_bad_request() {
    let (app, _repo) = setup().await;
    let (status, body) = get(&app, "/audit-logs?from=last-week", Some("1"), "audit_logs.read").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_foreign_tenant_log_is_forbidden() {
    let (app, repo) = setup().await;
    let foreign = repo.record(entry(2, "specialty.created", 10)).await.unwrap();
    let own = repo.record(entry(1, "specialty.created", 10)).await.unwrap();

    let (status, body) = get(
        &app,
        &format!("/audit-logs/{}", foreign.id),
        Some("1"),
        "audit_logs.read",
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, body) = get(&app, &format!("/audit-logs/{}", own.id), Some("1"), "audit_logs.read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], own.id);
    assert_eq!(body["data"]["changes"], json!({"name": "Surgery"}));
}

#[tokio::test]
async fn test_unknown_log_is_not_found() {
    let (app, _repo) = setup().await;
    let (status, body) = get(&app, "/audit-logs/999", Some("1"), "audit_logs.read").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Audit log not found");
}

#[tokio::test]
async fn test_missing_tenant_or_permission_is_rejected() {
    let (app, _repo) = setup().await;

    let (status, _) = get(&app, "/audit-logs", None, "audit_logs.read").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get(&app, "/audit-logs", Some("1"), "billing.read").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Missing permission: audit_logs.read");
}
