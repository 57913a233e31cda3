//! SQL implementation of the subscription repository

use crate::error::{query_failed, DbError};
use crate::repositories::{from_unix, nullable};
use crate::repositories::subscription::{Subscription, SubscriptionRepository, SubscriptionSync};
use crate::DbClient;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::info;

const COLUMNS: &str = "id, tenant_id, customer_id, stripe_subscription_id, stripe_price_id, status, \
     amount, currency, billing_interval, current_period_end, cancel_at_period_end, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SqlSubscriptionRepository {
    db_client: DbClient,
}

impl SqlSubscriptionRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn map_row(row: &AnyRow) -> Result<Subscription, DbError> {
    let current_period_end = nullable::<i64>(row, "current_period_end")?
        .map(from_unix)
        .transpose()?;

    Ok(Subscription {
        id: row.try_get("id")?,
        tenant_id: row.try_get("tenant_id")?,
        customer_id: row.try_get("customer_id")?,
        stripe_subscription_id: row.try_get("stripe_subscription_id")?,
        stripe_price_id: nullable(row, "stripe_price_id")?,
        status: row.try_get("status")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        interval: row.try_get("billing_interval")?,
        current_period_end,
        cancel_at_period_end: row.try_get::<i64, _>("cancel_at_period_end")? != 0,
        created_at: from_unix(row.try_get("created_at")?)?,
        updated_at: from_unix(row.try_get("updated_at")?)?,
    })
}

impl SubscriptionRepository for SqlSubscriptionRepository {
    async fn upsert(&self, sync: SubscriptionSync) -> Result<Subscription, DbError> {
        let now = Utc::now().timestamp();
        let query = format!(
            "INSERT INTO subscriptions (tenant_id, customer_id, stripe_subscription_id, stripe_price_id, status, \
             amount, currency, billing_interval, current_period_end, cancel_at_period_end, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
             ON CONFLICT (stripe_subscription_id) DO UPDATE SET \
             stripe_price_id = excluded.stripe_price_id, status = excluded.status, amount = excluded.amount, \
             currency = excluded.currency, billing_interval = excluded.billing_interval, \
             current_period_end = excluded.current_period_end, \
             cancel_at_period_end = excluded.cancel_at_period_end, updated_at = excluded.updated_at \
             RETURNING {}",
            COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(sync.tenant_id)
            .bind(sync.customer_id)
            .bind(sync.stripe_subscription_id)
            .bind(sync.stripe_price_id)
            .bind(sync.status)
            .bind(sync.amount)
            .bind(sync.currency)
            .bind(sync.interval)
            .bind(sync.current_period_end.map(|at| at.timestamp()))
            .bind(i64::from(sync.cancel_at_period_end))
            .bind(now)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(query_failed("upsert subscription"))?;

        let stored = map_row(&row)?;
        info!(
            "Synced subscription {} ({}) for tenant {}",
            stored.stripe_subscription_id, stored.status, stored.tenant_id
        );
        Ok(stored)
    }

    async fn list_for_tenant(&self, tenant_id: i64) -> Result<Vec<Subscription>, DbError> {
        let query = format!(
            "SELECT {} FROM subscriptions WHERE tenant_id = $1 ORDER BY updated_at DESC, id DESC",
            COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(tenant_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(query_failed("load subscriptions"))?;

        rows.iter().map(map_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_db;
    use chrono::TimeZone;

    fn sync(status: &str) -> SubscriptionSync {
        SubscriptionSync {
            tenant_id: 3,
            customer_id: 1,
            stripe_subscription_id: "sub_123".to_string(),
            stripe_price_id: Some("price_pro_monthly".to_string()),
            status: status.to_string(),
            amount: 4900,
            currency: "usd".to_string(),
            interval: "month".to_string(),
            current_period_end: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            cancel_at_period_end: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let repo = SqlSubscriptionRepository::new(test_db().await);

        let created = repo.upsert(sync("trialing")).await.unwrap();
        assert_eq!(created.status, "trialing");
        assert_eq!(created.interval, "month");
        assert!(!created.cancel_at_period_end);

        let mut canceled = sync("canceled");
        canceled.cancel_at_period_end = true;
        let updated = repo.upsert(canceled).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.status, "canceled");
        assert!(updated.cancel_at_period_end);
        assert_eq!(updated.created_at, created.created_at);

        let listed = repo.list_for_tenant(3).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].current_period_end,
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(repo.list_for_tenant(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_without_price_or_period_end() {
        let repo = SqlSubscriptionRepository::new(test_db().await);
        let mut bare = sync("incomplete");
        bare.stripe_price_id = None;
        bare.current_period_end = None;

        let stored = repo.upsert(bare).await.unwrap();
        assert_eq!(stored.stripe_price_id, None);
        assert_eq!(stored.current_period_end, None);
        assert_eq!(repo.list_for_tenant(3).await.unwrap(), vec![stored]);
    }
}
