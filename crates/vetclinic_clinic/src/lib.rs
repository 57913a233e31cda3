// --- File: crates/vetclinic_clinic/src/lib.rs ---

pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use handlers::ClinicState;
pub use routes::routes;
