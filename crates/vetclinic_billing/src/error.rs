// --- File: crates/vetclinic_billing/src/error.rs ---
use thiserror::Error;
use vetclinic_common::{config_error, external_service_error, VetClinicError};
use vetclinic_db::DbError;

pub const PORTAL_SETTINGS_URL: &str = "https://dashboard.stripe.com/settings/billing/portal";

/// Billing-specific error types.
#[derive(Error, Debug)]
pub enum BillingError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
        code: Option<String>,
    },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Stripe answered successfully but without a field we need
    #[error("Unexpected Stripe response: {0}")]
    UnexpectedResponse(String),

    /// Stripe is switched off or not configured
    #[error("Billing is not enabled")]
    Disabled,

    /// No customer portal configuration exists in the Stripe account
    #[error("Stripe customer portal is not configured")]
    PortalNotConfigured,

    /// The tenant has no Stripe customer yet
    #[error("No billing account found for this clinic")]
    NoBillingAccount,

    #[error("Invoice not found")]
    InvoiceNotFound,

    /// Webhook signature verification failed
    #[error("Stripe webhook signature verification failed: {0}")]
    WebhookSignatureError(String),

    /// Webhook received but no signing secret is configured
    #[error("Stripe webhook secret is not configured")]
    WebhookNotConfigured,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl BillingError {
    /// `true` for Stripe's "no portal configuration" failures.
    pub fn is_portal_not_configured(&self) -> bool {
        match self {
            BillingError::ApiError { message, .. } => {
                message.contains("No configuration provided")
                    || message.contains("default configuration has not been created")
            }
            BillingError::PortalNotConfigured => true,
            _ => false,
        }
    }

    /// `true` when Stripe says the object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BillingError::ApiError { status_code: 404, .. }
        ) || matches!(
            self,
            BillingError::ApiError { code: Some(code), .. } if code == "resource_missing"
        )
    }
}

/// Convert BillingError to VetClinicError
impl From<BillingError> for VetClinicError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::RequestError(e) => external_service_error("Stripe API", e),
            BillingError::ApiError {
                status_code,
                message,
                code,
            } if status_code == 404 || code.as_deref() == Some("resource_missing") => {
                VetClinicError::NotFoundError(message)
            }
            BillingError::ApiError {
                status_code,
                message,
                ..
            } => match status_code {
                400 | 402 => VetClinicError::ValidationError(message),
                _ => external_service_error(
                    "Stripe API",
                    format!("Status: {}, Message: {}", status_code, message),
                ),
            },
            BillingError::ParseError(e) => {
                external_service_error("Stripe API", format!("response parse error: {}", e))
            }
            BillingError::UnexpectedResponse(msg) => external_service_error("Stripe API", msg),
            BillingError::Disabled => {
                VetClinicError::ServiceUnavailable("Billing is not enabled".to_string())
            }
            BillingError::PortalNotConfigured => VetClinicError::ValidationError(format!(
                "The Stripe customer portal is not configured. Save a portal configuration at {} and try again.",
                PORTAL_SETTINGS_URL
            )),
            BillingError::NoBillingAccount => VetClinicError::NotFoundError(
                "No billing account found for this clinic".to_string(),
            ),
            BillingError::InvoiceNotFound => {
                VetClinicError::NotFoundError("Invoice not found".to_string())
            }
            BillingError::WebhookSignatureError(msg) => {
                VetClinicError::ValidationError(format!("Invalid signature: {}", msg))
            }
            BillingError::WebhookNotConfigured => {
                config_error("Stripe webhook secret is not configured")
            }
            BillingError::Validation(msg) => VetClinicError::ValidationError(msg),
            BillingError::Db(e) => VetClinicError::from(e),
        }
    }
}
