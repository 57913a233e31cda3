// --- File: crates/vetclinic_stats/src/routes.rs ---
use crate::handlers::{get_stats_handler, StatsState};
use axum::{routing::get, Router};
use std::sync::Arc;
use vetclinic_db::{
    DbClient, SqlAuditLogRepository, SqlCustomerRepository, SqlSpecialtyRepository,
    SqlSubscriptionRepository,
};

/// Creates a router containing the statistics route.
pub fn routes(db: DbClient) -> Router {
    let state = Arc::new(StatsState {
        customers: SqlCustomerRepository::new(db.clone()),
        subscriptions: SqlSubscriptionRepository::new(db.clone()),
        specialties: SqlSpecialtyRepository::new(db.clone()),
        audit_logs: SqlAuditLogRepository::new(db),
    });

    Router::new()
        .route("/stats", get(get_stats_handler))
        .with_state(state)
}
