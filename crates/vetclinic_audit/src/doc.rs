// --- File: crates/vetclinic_audit/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::AuditLogQuery;
use vetclinic_common::models::AuditLog;
use vetclinic_common::PaginationMeta;

#[utoipa::path(
    get,
    path = "/audit-logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Page of audit log entries, newest first"),
        (status = 400, description = "Invalid filter value"),
        (status = 401, description = "Missing tenant context"),
        (status = 403, description = "Missing audit_logs.read permission")
    ),
    tag = "Audit Logs"
)]
fn doc_list_audit_logs_handler() {}

#[utoipa::path(
    get,
    path = "/audit-logs/{id}",
    params(("id" = i64, Path, description = "Audit log id")),
    responses(
        (status = 200, description = "The audit log entry", body = AuditLog),
        (status = 403, description = "Entry belongs to another clinic"),
        (status = 404, description = "Audit log not found")
    ),
    tag = "Audit Logs"
)]
fn doc_get_audit_log_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_list_audit_logs_handler, doc_get_audit_log_handler),
    components(schemas(AuditLog, PaginationMeta)),
    tags((name = "Audit Logs", description = "Tenant audit trail"))
)]
pub struct AuditApiDoc;
