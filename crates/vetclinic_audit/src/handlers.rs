// --- File: crates/vetclinic_audit/src/handlers.rs ---
use axum::extract::{Query, State};
use std::sync::Arc;
use tracing::{debug, warn};
use vetclinic_common::models::AuditLog;
use vetclinic_common::{
    forbidden, not_found, permissions, ApiResponse, AuthContext, PaginatedResponse,
    PaginationMeta, PathId, VetClinicError,
};
use vetclinic_db::{AuditLogRepository, SqlAuditLogRepository};

use crate::logic::AuditLogQuery;

// --- State for Audit Handlers ---
#[derive(Clone)]
pub struct AuditState {
    pub audit_logs: SqlAuditLogRepository,
}

/// `GET /audit-logs`: the caller's tenant's audit trail, newest first.
#[axum::debug_handler]
pub async fn list_audit_logs_handler(
    State(state): State<Arc<AuditState>>,
    auth: AuthContext,
    Query(query): Query<AuditLogQuery>,
) -> Result<PaginatedResponse<AuditLog>, VetClinicError> {
    auth.require(permissions::AUDIT_LOGS_READ)?;

    let page = query.pagination();
    let filter = query.filter()?;
    debug!(
        "Listing audit logs for tenant {} ({:?}, {:?})",
        auth.tenant_id, filter, page
    );

    let logs = state.audit_logs.list(auth.tenant_id, &filter, page).await?;
    let total = state.audit_logs.count(auth.tenant_id, &filter).await?;

    Ok(PaginatedResponse::new(logs, PaginationMeta::new(page, total)))
}

/// `GET /audit-logs/{id}`
///
/// Unknown ids are 404; an entry owned by another tenant is 403.
#[axum::debug_handler]
pub async fn get_audit_log_handler(
    State(state): State<Arc<AuditState>>,
    auth: AuthContext,
    PathId(id): PathId,
) -> Result<ApiResponse<AuditLog>, VetClinicError> {
    auth.require(permissions::AUDIT_LOGS_READ)?;

    let log = state
        .audit_logs
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("Audit log not found"))?;

    if log.tenant_id != auth.tenant_id {
        warn!(
            "Tenant {} attempted to read audit log {} of tenant {}",
            auth.tenant_id, id, log.tenant_id
        );
        return Err(forbidden("Access denied"));
    }

    Ok(ApiResponse::ok(log))
}
