//! SQL implementation of the clinic configuration repository

use crate::error::{query_failed, DbError};
use crate::repositories::clinic_configuration::{ClinicConfiguration, ClinicConfigurationRepository};
use crate::repositories::{from_unix, nullable};
use crate::DbClient;
use chrono::Utc;
use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::info;

const COLUMNS: &str = "id, tenant_id, clinic_name, timezone, currency, appointment_duration_minutes, \
     business_hours, settings, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlClinicConfigurationRepository {
    db_client: DbClient,
}

impl SqlClinicConfigurationRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn decode_json(row: &AnyRow, column: &str) -> Result<Value, DbError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| DbError::DecodeError(format!("{} is not valid JSON: {}", column, e)))
}

fn map_row(row: &AnyRow) -> Result<ClinicConfiguration, DbError> {
    Ok(ClinicConfiguration {
        id: Some(row.try_get("id")?),
        tenant_id: row.try_get("tenant_id")?,
        clinic_name: nullable(row, "clinic_name")?,
        timezone: row.try_get("timezone")?,
        currency: row.try_get("currency")?,
        appointment_duration_minutes: row.try_get("appointment_duration_minutes")?,
        business_hours: decode_json(row, "business_hours")?,
        settings: decode_json(row, "settings")?,
        created_at: Some(from_unix(row.try_get("created_at")?)?),
        updated_at: Some(from_unix(row.try_get("updated_at")?)?),
    })
}

impl ClinicConfigurationRepository for SqlClinicConfigurationRepository {
    async fn find_by_tenant(&self, tenant_id: i64) -> Result<Option<ClinicConfiguration>, DbError> {
        let query = format!(
            "SELECT {} FROM clinic_configurations WHERE tenant_id = $1",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(tenant_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(query_failed("find clinic configuration"))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn upsert(&self, config: &ClinicConfiguration) -> Result<ClinicConfiguration, DbError> {
        let now = Utc::now().timestamp();
        let query = format!(
            "INSERT INTO clinic_configurations (tenant_id, clinic_name, timezone, currency, \
             appointment_duration_minutes, business_hours, settings, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             ON CONFLICT (tenant_id) DO UPDATE SET \
             clinic_name = excluded.clinic_name, timezone = excluded.timezone, currency = excluded.currency, \
             appointment_duration_minutes = excluded.appointment_duration_minutes, \
             business_hours = excluded.business_hours, settings = excluded.settings, \
             updated_at = excluded.updated_at \
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(config.tenant_id)
            .bind(config.clinic_name.clone())
            .bind(config.timezone.clone())
            .bind(config.currency.clone())
            .bind(config.appointment_duration_minutes)
            .bind(config.business_hours.to_string())
            .bind(config.settings.to_string())
            .bind(now)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("save clinic configuration"))?;

        info!("Saved clinic configuration for tenant {}", config.tenant_id);
        map_row(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_db;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let repo = SqlClinicConfigurationRepository::new(test_db().await);
        assert!(repo.find_by_tenant(8).await.unwrap().is_none());

        let mut config = ClinicConfiguration::default_for(8);
        config.clinic_name = Some("Happy Paws".to_string());
        config.business_hours = json!({"mon": ["08:00", "17:00"]});
        let first = repo.upsert(&config).await.unwrap();
        assert!(first.id.is_some());
        assert_eq!(first.business_hours, json!({"mon": ["08:00", "17:00"]}));

        config.timezone = "Europe/Zurich".to_string();
        let second = repo.upsert(&config).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.timezone, "Europe/Zurich");
        assert_eq!(second.created_at, first.created_at);

        let stored = repo.find_by_tenant(8).await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_defaults_without_clinic_name() {
        let repo = SqlClinicConfigurationRepository::new(test_db().await);
        let saved = repo.upsert(&ClinicConfiguration::default_for(9)).await.unwrap();
        assert_eq!(saved.clinic_name, None);
        assert_eq!(repo.find_by_tenant(9).await.unwrap(), Some(saved));
    }
}
