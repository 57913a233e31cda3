// --- File: crates/vetclinic_stats/src/lib.rs ---

pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use handlers::StatsState;
pub use logic::{compute_stats, StatsPeriod};
pub use routes::routes;
