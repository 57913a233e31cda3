// --- File: crates/vetclinic_billing/src/lib.rs ---

pub mod client;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use client::StripeClient;
pub use error::BillingError;
pub use handlers::BillingState;
pub use routes::routes;
