// --- File: crates/vetclinic_common/src/plans.rs ---
use serde::Serialize;
use vetclinic_config::{BillingConfig, PlanLimits};

use crate::models::Subscription;

pub const FREE_PLAN_ID: &str = "free";

/// The plan a tenant is currently on.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedPlan {
    pub plan_id: String,
    pub plan_name: String,
    pub limits: PlanLimits,
    pub subscription_status: Option<String>,
    pub stripe_price_id: Option<String>,
}

/// Picks the plan from the tenant's subscriptions.
///
/// Only active or trialing subscriptions whose price belongs to a configured
/// plan count; the most recently updated one wins. Without one the tenant is
/// on the free plan.
pub fn resolve_plan(billing: &BillingConfig, subscriptions: &[Subscription]) -> ResolvedPlan {
    let matched = subscriptions
        .iter()
        .filter(|s| s.is_active())
        .filter_map(|s| {
            let price_id = s.stripe_price_id.as_deref()?;
            billing.plan_for_price(price_id).map(|plan| (s, plan))
        })
        .max_by_key(|(s, _)| s.updated_at);

    match matched {
        Some((subscription, plan)) => ResolvedPlan {
            plan_id: plan.id.clone(),
            plan_name: plan.name.clone(),
            limits: plan.limits.clone(),
            subscription_status: Some(subscription.status.clone()),
            stripe_price_id: subscription.stripe_price_id.clone(),
        },
        None => ResolvedPlan {
            plan_id: FREE_PLAN_ID.to_string(),
            plan_name: "Free".to_string(),
            limits: billing.free_plan.clone(),
            subscription_status: None,
            stripe_price_id: None,
        },
    }
}

/// `true` when `current` usage leaves no room under `limit`.
/// A missing limit is unlimited.
pub fn limit_reached(limit: Option<i64>, current: i64) -> bool {
    limit.is_some_and(|max| current >= max)
}
