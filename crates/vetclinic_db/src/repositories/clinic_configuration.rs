//! Repository for per-tenant clinic configuration

use crate::error::DbError;

pub use vetclinic_common::models::ClinicConfiguration;

pub trait ClinicConfigurationRepository {
    fn find_by_tenant(
        &self,
        tenant_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ClinicConfiguration>, DbError>> + Send;

    /// Writes the whole configuration for `config.tenant_id`, creating the
    /// row on first save. `id` and timestamps of the input are ignored.
    fn upsert(
        &self,
        config: &ClinicConfiguration,
    ) -> impl std::future::Future<Output = Result<ClinicConfiguration, DbError>> + Send;
}
