//! Table definitions, created at startup with `CREATE TABLE IF NOT EXISTS`.
//!
//! Timestamps are unix seconds and booleans are 0/1 so every column decodes
//! through the Any driver on both backends.

use crate::client::{DbBackend, DbClient};
use crate::error::DbError;
use tracing::{debug, info};

const TABLES: &[(&str, &str)] = &[
    (
        "audit_logs",
        r#"
        CREATE TABLE IF NOT EXISTS audit_logs (
            id {id},
            tenant_id BIGINT NOT NULL,
            user_id BIGINT,
            action TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id BIGINT,
            changes TEXT,
            ip_address TEXT,
            user_agent TEXT,
            created_at BIGINT NOT NULL
        )
        "#,
    ),
    (
        "customers",
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id {id},
            tenant_id BIGINT NOT NULL UNIQUE,
            stripe_customer_id TEXT NOT NULL UNIQUE,
            email TEXT,
            name TEXT,
            created_at BIGINT NOT NULL
        )
        "#,
    ),
    (
        "subscriptions",
        r#"
        CREATE TABLE IF NOT EXISTS subscriptions (
            id {id},
            tenant_id BIGINT NOT NULL,
            customer_id BIGINT NOT NULL,
            stripe_subscription_id TEXT NOT NULL UNIQUE,
            stripe_price_id TEXT,
            status TEXT NOT NULL,
            amount BIGINT NOT NULL DEFAULT 0,
            currency TEXT NOT NULL,
            billing_interval TEXT NOT NULL,
            current_period_end BIGINT,
            cancel_at_period_end BIGINT NOT NULL DEFAULT 0,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )
        "#,
    ),
    (
        "specialties",
        r#"
        CREATE TABLE IF NOT EXISTS specialties (
            id {id},
            tenant_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            is_active BIGINT NOT NULL DEFAULT 1,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )
        "#,
    ),
    (
        "clinic_configurations",
        r#"
        CREATE TABLE IF NOT EXISTS clinic_configurations (
            id {id},
            tenant_id BIGINT NOT NULL UNIQUE,
            clinic_name TEXT,
            timezone TEXT NOT NULL,
            currency TEXT NOT NULL,
            appointment_duration_minutes BIGINT NOT NULL,
            business_hours TEXT NOT NULL,
            settings TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_tenant_created ON audit_logs (tenant_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_tenant ON subscriptions (tenant_id)",
    "CREATE INDEX IF NOT EXISTS idx_specialties_tenant ON specialties (tenant_id)",
];

fn id_column(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        DbBackend::Postgres => "BIGSERIAL PRIMARY KEY",
    }
}

/// Creates every table and index that does not exist yet.
pub async fn init_schema(db: &DbClient) -> Result<(), DbError> {
    let id = id_column(db.backend());
    for (table, ddl) in TABLES {
        debug!("Ensuring table {}", table);
        db.execute(&ddl.replace("{id}", id)).await?;
    }
    for index in INDEXES {
        db.execute(index).await?;
    }
    info!("Database schema initialized ({} tables)", TABLES.len());
    Ok(())
}
