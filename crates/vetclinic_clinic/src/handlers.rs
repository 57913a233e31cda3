// --- File: crates/vetclinic_clinic/src/handlers.rs ---
use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use vetclinic_audit::record_quietly;
use vetclinic_common::models::{ClinicConfiguration, NewAuditLog, Specialty};
use vetclinic_common::plans::{limit_reached, resolve_plan};
use vetclinic_common::{
    conflict, forbidden, not_found, permissions, ApiResponse, AuthContext, JsonBody,
    PaginatedResponse, PaginationMeta, PathId, VetClinicError,
};
use vetclinic_config::AppConfig;
use vetclinic_db::{
    ClinicConfigurationRepository, SpecialtyFilter, SpecialtyRepository, SqlAuditLogRepository,
    SqlClinicConfigurationRepository, SqlSpecialtyRepository, SqlSubscriptionRepository,
    SubscriptionRepository,
};

use crate::logic::{
    specialty_changes_json, CreateSpecialtyRequest, SpecialtyListQuery,
    UpdateClinicConfigurationRequest, UpdateSpecialtyRequest,
};

const SPECIALTY_NOT_FOUND: &str = "Specialty not found";
const DUPLICATE_SPECIALTY: &str = "A specialty with this name already exists";

// --- State for Clinic Handlers ---
#[derive(Clone)]
pub struct ClinicState {
    pub config: Arc<AppConfig>,
    pub specialties: SqlSpecialtyRepository,
    pub configurations: SqlClinicConfigurationRepository,
    pub subscriptions: SqlSubscriptionRepository,
    pub audit_logs: SqlAuditLogRepository,
}

impl ClinicState {
    /// Rejects a new specialty when the tenant's plan is at its limit.
    async fn check_specialty_limit(&self, tenant_id: i64) -> Result<(), VetClinicError> {
        let subscriptions = self.subscriptions.list_for_tenant(tenant_id).await?;
        let plan = resolve_plan(&self.config.billing, &subscriptions);
        let current = self
            .specialties
            .count(tenant_id, &SpecialtyFilter::default())
            .await?;

        if limit_reached(plan.limits.max_specialties, current) {
            warn!(
                "Tenant {} reached the specialty limit of plan {} ({})",
                tenant_id, plan.plan_id, current
            );
            return Err(forbidden(format!(
                "Specialty limit reached for the {} plan ({}). Upgrade your plan to add more.",
                plan.plan_name, current
            )));
        }
        Ok(())
    }
}

// --- Specialties ---

#[axum::debug_handler]
pub async fn list_specialties_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
    Query(query): Query<SpecialtyListQuery>,
) -> Result<PaginatedResponse<Specialty>, VetClinicError> {
    auth.require(permissions::SPECIALTIES_READ)?;

    let page = query.pagination();
    let filter = query.filter()?;
    let specialties = state.specialties.list(auth.tenant_id, &filter, page).await?;
    let total = state.specialties.count(auth.tenant_id, &filter).await?;

    Ok(PaginatedResponse::new(
        specialties,
        PaginationMeta::new(page, total),
    ))
}

#[axum::debug_handler]
pub async fn get_specialty_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
    PathId(id): PathId,
) -> Result<ApiResponse<Specialty>, VetClinicError> {
    auth.require(permissions::SPECIALTIES_READ)?;

    let specialty = state
        .specialties
        .find(auth.tenant_id, id)
        .await?
        .ok_or_else(|| not_found(SPECIALTY_NOT_FOUND))?;
    Ok(ApiResponse::ok(specialty))
}

/// `POST /specialties`: 201 with the created specialty.
#[axum::debug_handler]
pub async fn create_specialty_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
    JsonBody(payload): JsonBody<CreateSpecialtyRequest>,
) -> Result<(StatusCode, ApiResponse<Specialty>), VetClinicError> {
    auth.require(permissions::SPECIALTIES_WRITE)?;

    let new_specialty = payload.into_new_specialty(auth.tenant_id)?;
    state.check_specialty_limit(auth.tenant_id).await?;
    if state
        .specialties
        .name_exists(auth.tenant_id, &new_specialty.name, None)
        .await?
    {
        return Err(conflict(DUPLICATE_SPECIALTY));
    }

    let specialty = state.specialties.create(new_specialty).await?;
    info!(
        "Tenant {} created specialty {} ({})",
        auth.tenant_id, specialty.id, specialty.name
    );

    record_quietly(
        &state.audit_logs,
        NewAuditLog::from_context(
            &auth,
            "specialty.created",
            "specialty",
            Some(specialty.id),
            Some(json!({
                "name": specialty.name,
                "description": specialty.description,
                "is_active": specialty.is_active,
            })),
        ),
    )
    .await;

    Ok((StatusCode::CREATED, ApiResponse::ok(specialty)))
}

#[axum::debug_handler]
pub async fn update_specialty_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<UpdateSpecialtyRequest>,
) -> Result<ApiResponse<Specialty>, VetClinicError> {
    auth.require(permissions::SPECIALTIES_WRITE)?;

    let changes = payload.into_changes()?;
    state
        .specialties
        .find(auth.tenant_id, id)
        .await?
        .ok_or_else(|| not_found(SPECIALTY_NOT_FOUND))?;
    if let Some(name) = &changes.name {
        if state
            .specialties
            .name_exists(auth.tenant_id, name, Some(id))
            .await?
        {
            return Err(conflict(DUPLICATE_SPECIALTY));
        }
    }

    let recorded = specialty_changes_json(&changes);
    let specialty = state
        .specialties
        .update(auth.tenant_id, id, changes)
        .await?
        .ok_or_else(|| not_found(SPECIALTY_NOT_FOUND))?;
    debug!("Tenant {} updated specialty {}", auth.tenant_id, id);

    record_quietly(
        &state.audit_logs,
        NewAuditLog::from_context(&auth, "specialty.updated", "specialty", Some(id), Some(recorded)),
    )
    .await;

    Ok(ApiResponse::ok(specialty))
}

#[axum::debug_handler]
pub async fn delete_specialty_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
    PathId(id): PathId,
) -> Result<ApiResponse<Value>, VetClinicError> {
    auth.require(permissions::SPECIALTIES_WRITE)?;

    let existing = state
        .specialties
        .find(auth.tenant_id, id)
        .await?
        .ok_or_else(|| not_found(SPECIALTY_NOT_FOUND))?;
    if !state.specialties.delete(auth.tenant_id, id).await? {
        return Err(not_found(SPECIALTY_NOT_FOUND));
    }
    info!("Tenant {} deleted specialty {}", auth.tenant_id, id);

    record_quietly(
        &state.audit_logs,
        NewAuditLog::from_context(
            &auth,
            "specialty.deleted",
            "specialty",
            Some(id),
            Some(json!({ "name": existing.name })),
        ),
    )
    .await;

    Ok(ApiResponse::ok(json!({ "id": id, "deleted": true })))
}

// --- Clinic configuration ---

/// `GET /clinic-configuration`: the stored configuration or the defaults.
#[axum::debug_handler]
pub async fn get_clinic_configuration_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
) -> Result<ApiResponse<ClinicConfiguration>, VetClinicError> {
    auth.require(permissions::CLINIC_READ)?;

    let configuration = state
        .configurations
        .find_by_tenant(auth.tenant_id)
        .await?
        .unwrap_or_else(|| ClinicConfiguration::default_for(auth.tenant_id));
    Ok(ApiResponse::ok(configuration))
}

#[axum::debug_handler]
pub async fn update_clinic_configuration_handler(
    State(state): State<Arc<ClinicState>>,
    auth: AuthContext,
    JsonBody(payload): JsonBody<UpdateClinicConfigurationRequest>,
) -> Result<ApiResponse<ClinicConfiguration>, VetClinicError> {
    auth.require(permissions::CLINIC_WRITE)?;

    let current = state
        .configurations
        .find_by_tenant(auth.tenant_id)
        .await?
        .unwrap_or_else(|| ClinicConfiguration::default_for(auth.tenant_id));
    let (next, changed) = payload.apply_to(&current)?;

    let saved = state.configurations.upsert(&next).await?;
    info!("Tenant {} updated clinic configuration", auth.tenant_id);

    record_quietly(
        &state.audit_logs,
        NewAuditLog::from_context(
            &auth,
            "clinic_configuration.updated",
            "clinic_configuration",
            saved.id,
            Some(changed),
        ),
    )
    .await;

    Ok(ApiResponse::ok(saved))
}
