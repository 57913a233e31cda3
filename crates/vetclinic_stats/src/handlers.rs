// --- File: crates/vetclinic_stats/src/handlers.rs ---
use axum::extract::{Query, State};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use vetclinic_common::{permissions, ApiResponse, AuthContext, VetClinicError};
use vetclinic_db::{
    AuditLogRepository, CustomerRepository, SpecialtyRepository, SqlAuditLogRepository,
    SqlCustomerRepository, SqlSpecialtyRepository, SqlSubscriptionRepository,
    SubscriptionRepository,
};

use crate::logic::{compute_stats, ClinicStats, StatsInput, StatsQuery};

// --- State for Stats Handlers ---
#[derive(Clone)]
pub struct StatsState {
    pub customers: SqlCustomerRepository,
    pub subscriptions: SqlSubscriptionRepository,
    pub specialties: SqlSpecialtyRepository,
    pub audit_logs: SqlAuditLogRepository,
}

/// `GET /stats?period=today|week|month|year|all`
#[axum::debug_handler]
pub async fn get_stats_handler(
    State(state): State<Arc<StatsState>>,
    auth: AuthContext,
    Query(query): Query<StatsQuery>,
) -> Result<ApiResponse<ClinicStats>, VetClinicError> {
    auth.require(permissions::STATS_READ)?;
    let period = query.period()?;

    let tenant_id = auth.tenant_id;
    let (customers, subscriptions, specialties, audit_logs) = tokio::try_join!(
        state.customers.list_for_tenant(tenant_id),
        state.subscriptions.list_for_tenant(tenant_id),
        state.specialties.list_for_tenant(tenant_id),
        state.audit_logs.list_for_tenant(tenant_id),
    )?;
    debug!(
        "Computing {} stats for tenant {} over {} audit events",
        period,
        tenant_id,
        audit_logs.len()
    );

    let input = StatsInput {
        customers,
        subscriptions,
        specialties,
        audit_logs,
    };
    Ok(ApiResponse::ok(compute_stats(period, Utc::now(), &input)))
}
