//! Repository traits and their SQL implementations, one pair per entity.

pub mod audit_log;
pub mod audit_log_sql;
pub mod clinic_configuration;
pub mod clinic_configuration_sql;
pub mod customer;
pub mod customer_sql;
mod filter;
pub mod specialty;
pub mod specialty_sql;
pub mod subscription;
pub mod subscription_sql;

pub use audit_log::{AuditLogFilter, AuditLogRepository};
pub use audit_log_sql::SqlAuditLogRepository;
pub use clinic_configuration::ClinicConfigurationRepository;
pub use clinic_configuration_sql::SqlClinicConfigurationRepository;
pub use customer::{CustomerRepository, NewCustomer};
pub use customer_sql::SqlCustomerRepository;
pub use specialty::{NewSpecialty, SpecialtyChanges, SpecialtyFilter, SpecialtyRepository};
pub use specialty_sql::SqlSpecialtyRepository;
pub use subscription::SubscriptionRepository;
pub use subscription_sql::SqlSubscriptionRepository;

use crate::error::DbError;
use chrono::{DateTime, Utc};
use sqlx::any::{Any, AnyRow};
use sqlx::{Decode, Row, Type, ValueRef};

/// Timestamps are stored as unix seconds.
pub(crate) fn from_unix(secs: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DbError::DecodeError(format!("timestamp out of range: {}", secs)))
}

/// Reads a nullable column. The `Any` driver reports a NULL value with its own
/// type, so `Option<T>` cannot go through the checked `try_get`.
pub(crate) fn nullable<'r, T>(row: &'r AnyRow, column: &str) -> Result<Option<T>, DbError>
where
    T: Decode<'r, Any> + Type<Any>,
{
    if row.try_get_raw(column)?.is_null() {
        return Ok(None);
    }
    Ok(Some(row.try_get(column)?))
}

#[cfg(test)]
pub(crate) async fn test_db() -> crate::DbClient {
    let db = crate::DbClient::from_url("sqlite::memory:")
        .await
        .expect("in-memory database");
    crate::schema::init_schema(&db).await.expect("schema");
    db
}
