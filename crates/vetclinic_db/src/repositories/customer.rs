//! Repository for Stripe customers (one per tenant)

use crate::error::DbError;

pub use vetclinic_common::models::Customer;

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub tenant_id: i64,
    pub stripe_customer_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

pub trait CustomerRepository {
    fn find_by_tenant(
        &self,
        tenant_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Customer>, DbError>> + Send;

    fn find_by_stripe_id(
        &self,
        stripe_customer_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Customer>, DbError>> + Send;

    /// Stores the customer. A second customer for the same tenant is a
    /// unique violation.
    fn create(
        &self,
        customer: NewCustomer,
    ) -> impl std::future::Future<Output = Result<Customer, DbError>> + Send;

    fn list_for_tenant(
        &self,
        tenant_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Customer>, DbError>> + Send;
}
