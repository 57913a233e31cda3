//! SQL implementation of the customer repository

use crate::error::{query_failed, DbError};
use crate::repositories::customer::{Customer, CustomerRepository, NewCustomer};
use crate::repositories::{from_unix, nullable};
use crate::DbClient;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::info;

const COLUMNS: &str = "id, tenant_id, stripe_customer_id, email, name, created_at";

#[derive(Debug, Clone)]
pub struct SqlCustomerRepository {
    db_client: DbClient,
}

impl SqlCustomerRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &AnyRow) -> Result<Customer, DbError> {
    Ok(Customer {
        id: row.try_get("id")?,
        tenant_id: row.try_get("tenant_id")?,
        stripe_customer_id: row.try_get("stripe_customer_id")?,
        email: nullable(row, "email")?,
        name: nullable(row, "name")?,
        created_at: from_unix(row.try_get("created_at")?)?,
    })
}

impl CustomerRepository for SqlCustomerRepository {
    async fn find_by_tenant(&self, tenant_id: i64) -> Result<Option<Customer>, DbError> {
        let query = format!("SELECT {} FROM customers WHERE tenant_id = $1", COLUMNS);
        let row = sqlx::query(&query)
            .bind(tenant_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(query_failed("find customer by tenant"))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn find_by_stripe_id(&self, stripe_customer_id: &str) -> Result<Option<Customer>, DbError> {
        let query = format!(
            "SELECT {} FROM customers WHERE stripe_customer_id = $1",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(stripe_customer_id.to_string())
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(query_failed("find customer by Stripe id"))?;

        row.as_ref().map(map_row).transpose()
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, DbError> {
        let query = format!(
            "INSERT INTO customers (tenant_id, stripe_customer_id, email, name, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(customer.tenant_id)
            .bind(customer.stripe_customer_id)
            .bind(customer.email)
            .bind(customer.name)
            .bind(Utc::now().timestamp())
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("insert customer"))?;

        let stored = map_row(&row)?;
        info!(
            "Stored Stripe customer {} for tenant {}",
            stored.stripe_customer_id, stored.tenant_id
        );
        Ok(stored)
    }

    async fn list_for_tenant(&self, tenant_id: i64) -> Result<Vec<Customer>, DbError> {
        let query = format!(
            "SELECT {} FROM customers WHERE tenant_id = $1 ORDER BY id",
            COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(tenant_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(query_failed("load customers"))?;

        rows.iter().map(map_row).collect()
    }
}
