// --- File: crates/vetclinic_audit/src/lib.rs ---

pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use handlers::AuditState;
pub use logic::{record_quietly, AuditLogQuery};
pub use routes::routes;
