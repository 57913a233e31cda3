// --- File: crates/vetclinic_stats/src/logic.rs ---

//! Period windows and the in-memory aggregation behind `GET /stats`.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use vetclinic_common::models::{AuditLog, Customer, Specialty, Subscription};
use vetclinic_common::{validation_error, VetClinicError};

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Today,
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl StatsPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            StatsPeriod::Today => "today",
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::Year => "year",
            StatsPeriod::All => "all",
        }
    }

    /// The `[start, now]` window of the period. `all` has no start.
    pub fn window(self, now: DateTime<Utc>) -> StatsWindow {
        let start = match self {
            StatsPeriod::Today => Some(now.date_naive().and_time(NaiveTime::MIN).and_utc()),
            StatsPeriod::Week => Some(now - Duration::days(7)),
            StatsPeriod::Month => Some(now - Duration::days(30)),
            StatsPeriod::Year => Some(now - Duration::days(365)),
            StatsPeriod::All => None,
        };
        StatsWindow { start, end: now }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = VetClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(StatsPeriod::Today),
            "week" => Ok(StatsPeriod::Week),
            "month" => Ok(StatsPeriod::Month),
            "year" => Ok(StatsPeriod::Year),
            "all" => Ok(StatsPeriod::All),
            _ => Err(validation_error(format!(
                "Invalid period: {}. Expected one of: today, week, month, year, all",
                s
            ))),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl StatsWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && at <= self.end
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// today, week, month (default), year or all
    pub period: Option<String>,
}

impl StatsQuery {
    pub fn period(&self) -> Result<StatsPeriod, VetClinicError> {
        match self.period.as_deref().map(str::trim) {
            None | Some("") => Ok(StatsPeriod::default()),
            Some(raw) => raw.parse(),
        }
    }
}

// --- Response ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total: i64,
    pub new: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionStats {
    pub total: i64,
    pub active: i64,
    pub new: i64,
    pub by_status: BTreeMap<String, i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueStats {
    /// Monthly recurring revenue in minor units of `currency`.
    pub mrr: i64,
    /// Currency of the first active subscription; `None` while there is none.
    pub currency: Option<String>,
    /// MRR of every currency with an active subscription.
    pub by_currency: BTreeMap<String, i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialtyStats {
    pub total: i64,
    pub active: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityStats {
    /// Audit events inside the window.
    pub events: i64,
    pub by_action: BTreeMap<String, i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicStats {
    pub period: StatsPeriod,
    pub window: StatsWindow,
    pub customers: CustomerStats,
    pub subscriptions: SubscriptionStats,
    pub revenue: RevenueStats,
    pub specialties: SpecialtyStats,
    pub activity: ActivityStats,
}

/// Everything the statistics are computed from, already scoped to one tenant.
#[derive(Debug, Default)]
pub struct StatsInput {
    pub customers: Vec<Customer>,
    pub subscriptions: Vec<Subscription>,
    pub specialties: Vec<Specialty>,
    pub audit_logs: Vec<AuditLog>,
}

/// Aggregates `input` for `period`, one pass over each collection.
///
/// Totals count every row; `new`, `events` and `by_action` only rows created
/// inside the window. MRR and the active counts are current values.
pub fn compute_stats(period: StatsPeriod, now: DateTime<Utc>, input: &StatsInput) -> ClinicStats {
    let window = period.window(now);

    let customers = CustomerStats {
        total: input.customers.len() as i64,
        new: input
            .customers
            .iter()
            .filter(|c| window.contains(c.created_at))
            .count() as i64,
    };

    let mut subscriptions = SubscriptionStats {
        total: 0,
        active: 0,
        new: 0,
        by_status: BTreeMap::new(),
    };
    let mut revenue = RevenueStats {
        mrr: 0,
        currency: None,
        by_currency: BTreeMap::new(),
    };
    for subscription in &input.subscriptions {
        subscriptions.total += 1;
        *subscriptions
            .by_status
            .entry(subscription.status.clone())
            .or_insert(0) += 1;
        if window.contains(subscription.created_at) {
            subscriptions.new += 1;
        }
        if subscription.is_active() {
            subscriptions.active += 1;
            let currency = subscription.currency.to_uppercase();
            *revenue.by_currency.entry(currency.clone()).or_insert(0) +=
                subscription.monthly_amount();
            revenue.currency.get_or_insert(currency);
        }
    }
    if let Some(currency) = &revenue.currency {
        revenue.mrr = revenue.by_currency.get(currency).copied().unwrap_or(0);
    }

    let specialties = SpecialtyStats {
        total: input.specialties.len() as i64,
        active: input.specialties.iter().filter(|s| s.is_active).count() as i64,
    };

    let mut activity = ActivityStats {
        events: 0,
        by_action: BTreeMap::new(),
    };
    for log in input.audit_logs.iter().filter(|l| window.contains(l.created_at)) {
        activity.events += 1;
        *activity.by_action.entry(log.action.clone()).or_insert(0) += 1;
    }

    ClinicStats {
        period,
        window,
        customers,
        subscriptions,
        revenue,
        specialties,
        activity,
    }
}
