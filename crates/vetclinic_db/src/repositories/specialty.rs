//! Repository for clinic specialties

use crate::error::DbError;
use vetclinic_common::Pagination;

pub use vetclinic_common::models::Specialty;

/// Optional list filters for specialties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialtyFilter {
    pub is_active: Option<bool>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSpecialty {
    pub tenant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Partial update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialtyChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

pub trait SpecialtyRepository {
    fn list(
        &self,
        tenant_id: i64,
        filter: &SpecialtyFilter,
        page: Pagination,
    ) -> impl std::future::Future<Output = Result<Vec<Specialty>, DbError>> + Send;

    fn count(
        &self,
        tenant_id: i64,
        filter: &SpecialtyFilter,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;

    /// Finds a specialty of `tenant_id`; rows of other tenants are invisible.
    fn find(
        &self,
        tenant_id: i64,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Specialty>, DbError>> + Send;

    fn create(
        &self,
        specialty: NewSpecialty,
    ) -> impl std::future::Future<Output = Result<Specialty, DbError>> + Send;

    /// Applies `changes`; `None` when the specialty does not exist for the tenant.
    fn update(
        &self,
        tenant_id: i64,
        id: i64,
        changes: SpecialtyChanges,
    ) -> impl std::future::Future<Output = Result<Option<Specialty>, DbError>> + Send;

    /// Returns `true` if a row was deleted.
    fn delete(
        &self,
        tenant_id: i64,
        id: i64,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Case-insensitive name lookup, optionally ignoring one id (for updates).
    fn name_exists(
        &self,
        tenant_id: i64,
        name: &str,
        exclude_id: Option<i64>,
    ) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    fn list_for_tenant(
        &self,
        tenant_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Specialty>, DbError>> + Send;
}
