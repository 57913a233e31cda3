// --- File: crates/vetclinic_clinic/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    CreateSpecialtyRequest, SpecialtyListQuery, UpdateClinicConfigurationRequest,
    UpdateSpecialtyRequest,
};
use vetclinic_common::models::{ClinicConfiguration, Specialty};

#[utoipa::path(
    get,
    path = "/specialties",
    params(SpecialtyListQuery),
    responses(
        (status = 200, description = "Page of the clinic's specialties, by name"),
        (status = 400, description = "Invalid active filter"),
        (status = 403, description = "Missing specialties.read permission")
    ),
    tag = "Specialties"
)]
fn doc_list_specialties_handler() {}

#[utoipa::path(
    get,
    path = "/specialties/{id}",
    params(("id" = i64, Path, description = "Specialty id")),
    responses(
        (status = 200, description = "The specialty", body = Specialty),
        (status = 404, description = "Specialty not found")
    ),
    tag = "Specialties"
)]
fn doc_get_specialty_handler() {}

#[utoipa::path(
    post,
    path = "/specialties",
    request_body = CreateSpecialtyRequest,
    responses(
        (status = 201, description = "Specialty created", body = Specialty),
        (status = 400, description = "Name is required"),
        (status = 403, description = "Plan limit reached or missing specialties.write"),
        (status = 409, description = "A specialty with this name already exists")
    ),
    tag = "Specialties"
)]
fn doc_create_specialty_handler() {}

#[utoipa::path(
    put,
    path = "/specialties/{id}",
    params(("id" = i64, Path, description = "Specialty id")),
    request_body = UpdateSpecialtyRequest,
    responses(
        (status = 200, description = "Specialty updated", body = Specialty),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Specialty not found"),
        (status = 409, description = "A specialty with this name already exists")
    ),
    tag = "Specialties"
)]
fn doc_update_specialty_handler() {}

#[utoipa::path(
    delete,
    path = "/specialties/{id}",
    params(("id" = i64, Path, description = "Specialty id")),
    responses(
        (status = 200, description = "Specialty deleted"),
        (status = 404, description = "Specialty not found")
    ),
    tag = "Specialties"
)]
fn doc_delete_specialty_handler() {}

#[utoipa::path(
    get,
    path = "/clinic-configuration",
    responses(
        (status = 200, description = "Stored configuration or defaults", body = ClinicConfiguration)
    ),
    tag = "Clinic Configuration"
)]
fn doc_get_clinic_configuration_handler() {}

#[utoipa::path(
    put,
    path = "/clinic-configuration",
    request_body = UpdateClinicConfigurationRequest,
    responses(
        (status = 200, description = "Configuration saved", body = ClinicConfiguration),
        (status = 400, description = "Invalid timezone, currency, duration or JSON field")
    ),
    tag = "Clinic Configuration"
)]
fn doc_update_clinic_configuration_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_list_specialties_handler,
        doc_get_specialty_handler,
        doc_create_specialty_handler,
        doc_update_specialty_handler,
        doc_delete_specialty_handler,
        doc_get_clinic_configuration_handler,
        doc_update_clinic_configuration_handler
    ),
    components(schemas(
        Specialty,
        CreateSpecialtyRequest,
        UpdateSpecialtyRequest,
        ClinicConfiguration,
        UpdateClinicConfigurationRequest
    )),
    tags(
        (name = "Specialties", description = "Services offered by the clinic"),
        (name = "Clinic Configuration", description = "Per-clinic settings")
    )
)]
pub struct ClinicApiDoc;
