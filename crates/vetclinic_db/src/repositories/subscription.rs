//! Repository for subscriptions mirrored from Stripe

use crate::error::DbError;

pub use vetclinic_common::models::{Subscription, SubscriptionSync};

pub trait SubscriptionRepository {
    /// Inserts or refreshes the row keyed by `stripe_subscription_id`.
    fn upsert(
        &self,
        sync: SubscriptionSync,
    ) -> impl std::future::Future<Output = Result<Subscription, DbError>> + Send;

    /// All subscriptions of a tenant, most recently updated first.
    fn list_for_tenant(
        &self,
        tenant_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Subscription>, DbError>> + Send;
}
