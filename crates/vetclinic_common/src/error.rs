// --- File: crates/vetclinic_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for every VetClinic controller.
///
/// Feature crates define their own error enums and implement
/// `From<SpecificError> for VetClinicError`; handlers return this type and
/// axum renders it through [`crate::http`].
#[derive(Error, Debug)]
pub enum VetClinicError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller could not be identified
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is known but lacks a permission or owns a different tenant
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., resource already exists)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A feature is switched off in configuration
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for VetClinicError {
    fn status_code(&self) -> u16 {
        match self {
            VetClinicError::ParseError(_) => 400,
            VetClinicError::ConfigError(_) => 500,
            VetClinicError::AuthError(_) => 401,
            VetClinicError::ForbiddenError(_) => 403,
            VetClinicError::ValidationError(_) => 400,
            VetClinicError::DatabaseError(_) => 500,
            VetClinicError::ExternalServiceError { .. } => 502,
            VetClinicError::ConflictError(_) => 409,
            VetClinicError::NotFoundError(_) => 404,
            VetClinicError::ServiceUnavailable(_) => 503,
            VetClinicError::InternalError(_) => 500,
        }
    }
}

impl VetClinicError {
    /// The message that is safe to hand to API clients.
    ///
    /// Client errors and 503 carry their own text. Other server-side
    /// failures get a fixed sentence; the cause goes to the logs and,
    /// in development mode, to `internal_message`.
    pub fn client_message(&self) -> String {
        match self {
            VetClinicError::ParseError(msg)
            | VetClinicError::AuthError(msg)
            | VetClinicError::ForbiddenError(msg)
            | VetClinicError::ValidationError(msg)
            | VetClinicError::ConflictError(msg)
            | VetClinicError::NotFoundError(msg)
            | VetClinicError::ServiceUnavailable(msg) => msg.clone(),
            VetClinicError::ExternalServiceError { service_name, .. } => {
                format!("{} request failed", service_name)
            }
            VetClinicError::ConfigError(_)
            | VetClinicError::DatabaseError(_)
            | VetClinicError::InternalError(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// `true` for failures that are the server's fault.
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        status >= 500 && status != 503
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, VetClinicError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, VetClinicError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, VetClinicError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| VetClinicError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, VetClinicError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| VetClinicError::InternalError(format!("{}: {}", f(), error)))
    }
}

impl From<serde_json::Error> for VetClinicError {
    fn from(err: serde_json::Error) -> Self {
        VetClinicError::ParseError(err.to_string())
    }
}

impl From<reqwest::Error> for VetClinicError {
    fn from(err: reqwest::Error) -> Self {
        external_service_error("HTTP", err)
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> VetClinicError {
    VetClinicError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> VetClinicError {
    VetClinicError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> VetClinicError {
    VetClinicError::NotFoundError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> VetClinicError {
    VetClinicError::ForbiddenError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> VetClinicError {
    VetClinicError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> VetClinicError {
    VetClinicError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> VetClinicError {
    VetClinicError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(validation_error("x").status_code(), 400);
        assert_eq!(VetClinicError::AuthError("x".into()).status_code(), 401);
        assert_eq!(forbidden("x").status_code(), 403);
        assert_eq!(not_found("x").status_code(), 404);
        assert_eq!(conflict("x").status_code(), 409);
        assert_eq!(external_service_error("Stripe", "x").status_code(), 502);
        assert_eq!(VetClinicError::ServiceUnavailable("x".into()).status_code(), 503);
        assert_eq!(internal_error("x").status_code(), 500);
    }

    #[test]
    fn test_client_message_hides_server_causes() {
        let err = VetClinicError::DatabaseError("no such table: specialties".into());
        assert_eq!(err.client_message(), "An unexpected error occurred");
        assert!(err.is_server_error());

        let err = external_service_error("Stripe API", "Status: 401, invalid key");
        assert_eq!(err.client_message(), "Stripe API request failed");

        let err = validation_error("Name is required");
        assert_eq!(err.client_message(), "Name is required");
        assert!(!err.is_server_error());

        let err = VetClinicError::ServiceUnavailable("Billing is disabled".into());
        assert_eq!(err.client_message(), "Billing is disabled");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_context_wraps_as_internal() {
        let parsed: Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err = parsed.context("decoding changes").unwrap_err();
        match err {
            VetClinicError::InternalError(msg) => assert!(msg.starts_with("decoding changes: ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
