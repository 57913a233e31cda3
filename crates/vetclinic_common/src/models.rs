// --- File: crates/vetclinic_common/src/models.rs ---

// Entities shared by the repositories and the controllers. Every row belongs
// to exactly one tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthContext;

/// A recorded mutation, written by the controllers and read back by the
/// audit-log endpoints.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLog {
    pub id: i64,
    pub tenant_id: i64,
    pub user_id: Option<i64>,
    /// e.g. "specialty.created"
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub changes: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An audit entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    pub tenant_id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub changes: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewAuditLog {
    /// Creates an entry attributed to the caller in `ctx`.
    pub fn from_context(
        ctx: &AuthContext,
        action: &str,
        entity_type: &str,
        entity_id: Option<i64>,
        changes: Option<Value>,
    ) -> Self {
        Self {
            tenant_id: ctx.tenant_id,
            user_id: ctx.user_id,
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            changes,
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        }
    }
}

/// The Stripe customer that pays for a tenant.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub tenant_id: i64,
    pub stripe_customer_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub tenant_id: i64,
    pub customer_id: i64,
    pub stripe_subscription_id: String,
    pub stripe_price_id: Option<String>,
    /// Stripe status: active, trialing, past_due, canceled, ...
    pub status: String,
    /// Price per interval in minor currency units.
    pub amount: i64,
    pub currency: String,
    /// day, week, month or year
    pub interval: String,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Active and trialing subscriptions count towards the plan and MRR.
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trialing")
    }

    /// The amount normalised to one month, in minor units.
    pub fn monthly_amount(&self) -> i64 {
        match self.interval.as_str() {
            "year" => self.amount / 12,
            "week" => self.amount * 52 / 12,
            "day" => self.amount * 365 / 12,
            _ => self.amount,
        }
    }
}

/// Subscription state as reported by Stripe, keyed by `stripe_subscription_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSync {
    pub tenant_id: i64,
    pub customer_id: i64,
    pub stripe_subscription_id: String,
    pub stripe_price_id: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub interval: String,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Specialty {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 30;

/// Per-tenant clinic settings. A tenant without a stored row gets
/// [`ClinicConfiguration::default_for`].
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicConfiguration {
    /// `None` until the configuration has been saved.
    pub id: Option<i64>,
    pub tenant_id: i64,
    pub clinic_name: Option<String>,
    pub timezone: String,
    pub currency: String,
    pub appointment_duration_minutes: i64,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub business_hours: Value,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub settings: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClinicConfiguration {
    pub fn default_for(tenant_id: i64) -> Self {
        Self {
            id: None,
            tenant_id,
            clinic_name: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            appointment_duration_minutes: DEFAULT_APPOINTMENT_MINUTES,
            business_hours: Value::Object(Default::default()),
            settings: Value::Object(Default::default()),
            created_at: None,
            updated_at: None,
        }
    }
}
