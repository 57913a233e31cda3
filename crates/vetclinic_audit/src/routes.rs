// --- File: crates/vetclinic_audit/src/routes.rs ---
use crate::handlers::{get_audit_log_handler, list_audit_logs_handler, AuditState};
use axum::{routing::get, Router};
use std::sync::Arc;
use vetclinic_db::{DbClient, SqlAuditLogRepository};

/// Creates a router containing all routes for the audit-log feature.
pub fn routes(db: DbClient) -> Router {
    let state = Arc::new(AuditState {
        audit_logs: SqlAuditLogRepository::new(db),
    });

    Router::new()
        .route("/audit-logs", get(list_audit_logs_handler))
        .route("/audit-logs/{id}", get(get_audit_log_handler))
        .with_state(state)
}
