//! SQL implementation of the audit log repository

use crate::error::{query_failed, DbError};
use crate::repositories::audit_log::{AuditLog, AuditLogFilter, AuditLogRepository, NewAuditLog};
use crate::repositories::filter::{BindValue, SqlFilter};
use crate::repositories::{from_unix, nullable};
use crate::DbClient;
use chrono::Utc;
use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use vetclinic_common::Pagination;

const COLUMNS: &str =
    "id, tenant_id, user_id, action, entity_type, entity_id, changes, ip_address, user_agent, created_at";

#[derive(Debug, Clone)]
pub struct SqlAuditLogRepository {
    db_client: DbClient,
}

impl SqlAuditLogRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &AnyRow) -> Result<AuditLog, DbError> {
    // Stored as text; anything that is not JSON is returned verbatim.
    let changes = nullable::<String>(row, "changes")?
        .map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)));

    Ok(AuditLog {
        id: row.try_get("id")?,
        tenant_id: row.try_get("tenant_id")?,
        user_id: nullable(row, "user_id")?,
        action: row.try_get("action")?,
        entity_type: row.try_get("entity_type")?,
        entity_id: nullable(row, "entity_id")?,
        changes,
        ip_address: nullable(row, "ip_address")?,
        user_agent: nullable(row, "user_agent")?,
        created_at: from_unix(row.try_get("created_at")?)?,
    })
}

fn build_filter(tenant_id: i64, filter: &AuditLogFilter) -> SqlFilter {
    let mut sql = SqlFilter::for_tenant(tenant_id);
    if let Some(user_id) = filter.user_id {
        sql.push("user_id = {}", BindValue::Int(user_id));
    }
    if let Some(action) = &filter.action {
        sql.push("action = {}", BindValue::Text(action.clone()));
    }
    if let Some(entity_type) = &filter.entity_type {
        sql.push("entity_type = {}", BindValue::Text(entity_type.clone()));
    }
    if let Some(entity_id) = filter.entity_id {
        sql.push("entity_id = {}", BindValue::Int(entity_id));
    }
    if let Some(from) = filter.from {
        sql.push("created_at >= {}", BindValue::Int(from.timestamp()));
    }
    if let Some(to) = filter.to {
        sql.push("created_at <= {}", BindValue::Int(to.timestamp()));
    }
    sql
}

impl AuditLogRepository for SqlAuditLogRepository {
    async fn record(&self, entry: NewAuditLog) -> Result<AuditLog, DbError> {
        debug!(
            "Recording audit log {} for tenant {}",
            entry.action, entry.tenant_id
        );

        let changes = entry.changes.as_ref().map(Value::to_string);
        let query = format!(
            "INSERT INTO audit_logs (tenant_id, user_id, action, entity_type, entity_id, changes, ip_address, user_agent, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(entry.tenant_id)
            .bind(entry.user_id)
            .bind(entry.action)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(changes)
            .bind(entry.ip_address)
            .bind(entry.user_agent)
            .bind(Utc::now().timestamp())
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("insert audit log"))?;

        map_row(&row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AuditLog>, DbError> {
        let query = format!("SELECT {} FROM audit_logs WHERE id = $1", COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(query_failed("find audit log"))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(
        &self,
        tenant_id: i64,
        filter: &AuditLogFilter,
        page: Pagination,
    ) -> Result<Vec<AuditLog>, DbError> {
        let sql_filter = build_filter(tenant_id, filter);
        let limit_at = sql_filter.next_placeholder();
        let query = format!(
            "SELECT {} FROM audit_logs{} ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            COLUMNS,
            sql_filter.where_sql(),
            limit_at,
            limit_at + 1
        );

        let rows = sql_filter
            .bind_to(sqlx::query(&query))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(query_failed("list audit logs"))?;

        rows.iter().map(map_row).collect()
    }

    async fn count(&self, tenant_id: i64, filter: &AuditLogFilter) -> Result<i64, DbError> {
        let sql_filter = build_filter(tenant_id, filter);
        let query = format!("SELECT COUNT(*) FROM audit_logs{}", sql_filter.where_sql());

        sql_filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("count audit logs"))
    }

    async fn list_for_tenant(&self, tenant_id: i64) -> Result<Vec<AuditLog>, DbError> {
        let query = format!(
            "SELECT {} FROM audit_logs WHERE tenant_id = $1 ORDER BY created_at DESC, id DESC",
            COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(tenant_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(query_failed("load audit logs"))?;

        rows.iter().map(map_row).collect()
    }
}
