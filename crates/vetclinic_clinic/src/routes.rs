// --- File: crates/vetclinic_clinic/src/routes.rs ---
use crate::handlers::{
    create_specialty_handler, delete_specialty_handler, get_clinic_configuration_handler,
    get_specialty_handler, list_specialties_handler, update_clinic_configuration_handler,
    update_specialty_handler, ClinicState,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use vetclinic_config::AppConfig;
use vetclinic_db::{
    DbClient, SqlAuditLogRepository, SqlClinicConfigurationRepository, SqlSpecialtyRepository,
    SqlSubscriptionRepository,
};

/// Creates a router containing the specialty and clinic-configuration routes.
pub fn routes(config: Arc<AppConfig>, db: DbClient) -> Router {
    let state = Arc::new(ClinicState {
        config,
        specialties: SqlSpecialtyRepository::new(db.clone()),
        configurations: SqlClinicConfigurationRepository::new(db.clone()),
        subscriptions: SqlSubscriptionRepository::new(db.clone()),
        audit_logs: SqlAuditLogRepository::new(db),
    });

    Router::new()
        .route(
            "/specialties",
            get(list_specialties_handler).post(create_specialty_handler),
        )
        .route(
            "/specialties/{id}",
            get(get_specialty_handler)
                .put(update_specialty_handler)
                .delete(delete_specialty_handler),
        )
        .route(
            "/clinic-configuration",
            get(get_clinic_configuration_handler).put(update_clinic_configuration_handler),
        )
        .with_state(state)
}
