// --- File: crates/vetclinic_common/src/lib.rs ---

pub mod auth; // Tenant/permission context extractor
pub mod error; // Error handling
pub mod http; // Envelopes, extractors, outbound client
pub mod logging; // Logging utilities
pub mod models; // Shared entities
pub mod pagination; // limit/offset parsing
pub mod plans; // Plan resolution from subscriptions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, forbidden, internal_error, not_found,
    validation_error, Context, HttpStatusCode, VetClinicError,
};

pub use auth::{permissions, AuthContext};

pub use http::{
    client::{create_client, DEFAULT_TIMEOUT_SECS},
    error_body, init_error_mode, ApiResponse, JsonBody, PaginatedResponse, PathId,
};

pub use pagination::{Pagination, PaginationMeta};

pub use logging::{init, init_from_config, init_with_level, log_error};
