//! Repository for audit log entries

use crate::error::DbError;
use chrono::{DateTime, Utc};
use vetclinic_common::Pagination;

pub use vetclinic_common::models::{AuditLog, NewAuditLog};

/// Whitelisted audit-log filters. Every field is optional and ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    pub user_id: Option<i64>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub trait AuditLogRepository {
    /// Stores a new entry stamped with the current time.
    fn record(
        &self,
        entry: NewAuditLog,
    ) -> impl std::future::Future<Output = Result<AuditLog, DbError>> + Send;

    /// Looks an entry up by id across all tenants; callers check ownership.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<AuditLog>, DbError>> + Send;

    /// One page of a tenant's entries, newest first.
    fn list(
        &self,
        tenant_id: i64,
        filter: &AuditLogFilter,
        page: Pagination,
    ) -> impl std::future::Future<Output = Result<Vec<AuditLog>, DbError>> + Send;

    /// Number of entries matching the same filter as [`Self::list`].
    fn count(
        &self,
        tenant_id: i64,
        filter: &AuditLogFilter,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;

    /// Every entry of a tenant, used for statistics.
    fn list_for_tenant(
        &self,
        tenant_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<AuditLog>, DbError>> + Send;
}
