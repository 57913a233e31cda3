//! SQL implementation of the specialty repository

use crate::error::{query_failed, DbError};
use crate::repositories::filter::{like_pattern, BindValue, SqlFilter};
use crate::repositories::{from_unix, nullable};
use crate::repositories::specialty::{
    NewSpecialty, Specialty, SpecialtyChanges, SpecialtyFilter, SpecialtyRepository,
};
use crate::DbClient;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::debug;
use vetclinic_common::Pagination;

const COLUMNS: &str = "id, tenant_id, name, description, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlSpecialtyRepository {
    db_client: DbClient,
}

impl SqlSpecialtyRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &AnyRow) -> Result<Specialty, DbError> {
    Ok(Specialty {
        id: row.try_get("id")?,
        tenant_id: row.try_get("tenant_id")?,
        name: row.try_get("name")?,
        description: nullable(row, "description")?,
        is_active: row.try_get::<i64, _>("is_active")? != 0,
        created_at: from_unix(row.try_get("created_at")?)?,
        updated_at: from_unix(row.try_get("updated_at")?)?,
    })
}

fn build_filter(tenant_id: i64, filter: &SpecialtyFilter) -> SqlFilter {
    let mut sql = SqlFilter::for_tenant(tenant_id);
    if let Some(active) = filter.is_active {
        sql.push("is_active = {}", BindValue::Int(i64::from(active)));
    }
    if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
        sql.push(
            "LOWER(name) LIKE LOWER({}) ESCAPE '\\'",
            BindValue::Text(like_pattern(term)),
        );
    }
    sql
}

impl SpecialtyRepository for SqlSpecialtyRepository {
    async fn list(
        &self,
        tenant_id: i64,
        filter: &SpecialtyFilter,
        page: Pagination,
    ) -> Result<Vec<Specialty>, DbError> {
        let sql_filter = build_filter(tenant_id, filter);
        let limit_at = sql_filter.next_placeholder();
        let query = format!(
            "SELECT {} FROM specialties{} ORDER BY name, id LIMIT ${} OFFSET ${}",
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
            .map_err(query_failed("list specialties"))?;

        rows.iter().map(map_row).collect()
    }

    async fn count(&self, tenant_id: i64, filter: &SpecialtyFilter) -> Result<i64, DbError> {
        let sql_filter = build_filter(tenant_id, filter);
        let query = format!("SELECT COUNT(*) FROM specialties{}", sql_filter.where_sql());

        sql_filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("count specialties"))
    }

    async fn find(&self, tenant_id: i64, id: i64) -> Result<Option<Specialty>, DbError> {
        let query = format!(
            "SELECT {} FROM specialties WHERE tenant_id = $1 AND id = $2",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(query_failed("find specialty"))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn create(&self, specialty: NewSpecialty) -> Result<Specialty, DbError> {
        debug!(
            "Creating specialty '{}' for tenant {}",
            specialty.name, specialty.tenant_id
        );
        let now = Utc::now().timestamp();
        let query = format!(
            "INSERT INTO specialties (tenant_id, name, description, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(specialty.tenant_id)
            .bind(specialty.name)
            .bind(specialty.description)
            .bind(i64::from(specialty.is_active))
            .bind(now)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("insert specialty"))?;

        map_row(&row)
    }

    async fn update(
        &self,
        tenant_id: i64,
        id: i64,
        changes: SpecialtyChanges,
    ) -> Result<Option<Specialty>, DbError> {
        let Some(current) = self.find(tenant_id, id).await? else {
            return Ok(None);
        };

        let name = changes.name.unwrap_or(current.name);
        let description = changes.description.unwrap_or(current.description);
        let is_active = changes.is_active.unwrap_or(current.is_active);

        let query = format!(
            "UPDATE specialties SET name = $1, description = $2, is_active = $3, updated_at = $4 \
             WHERE tenant_id = $5 AND id = $6 RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(name)
            .bind(description)
            .bind(i64::from(is_active))
            .bind(Utc::now().timestamp())
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(query_failed("update specialty"))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn delete(&self, tenant_id: i64, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM specialties WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(query_failed("delete specialty"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn name_exists(
        &self,
        tenant_id: i64,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM specialties WHERE tenant_id = $1 AND LOWER(name) = LOWER($2) AND id <> $3",
        )
        .bind(tenant_id)
        .bind(name.to_string())
        .bind(exclude_id.unwrap_or(0))
        .fetch_one(self.db_client.pool())
        .await
        .map_err(query_failed("check specialty name"))?;

        Ok(count > 0)
    }

    async fn list_for_tenant(&self, tenant_id: i64) -> Result<Vec<Specialty>, DbError> {
        let query = format!(
            "SELECT {} FROM specialties WHERE tenant_id = $1 ORDER BY id",
            COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(tenant_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(query_failed("load specialties"))?;

        rows.iter().map(map_row).collect()
    }
}
