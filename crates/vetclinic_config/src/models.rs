// --- File: crates/vetclinic_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Deployment Mode ---
/// Controls how much of an internal failure is revealed in error bodies.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Development,
    #[default]
    Production,
}

impl DeploymentMode {
    /// `true` when 5xx responses may carry the underlying cause.
    pub fn exposes_internal_errors(self) -> bool {
        self == DeploymentMode::Development
    }
}

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub environment: DeploymentMode,
    pub log_level: Option<String>, // e.g. "debug"; RUST_LOG still wins
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. VETCLINIC__DATABASE__URL=sqlite://data/vetclinic.db
    pub max_connections: Option<u32>,
}

// --- Stripe Config ---
// The secret key and webhook secret are normally "secret_from_env" in the
// config file and resolved from STRIPE_SECRET_KEY / STRIPE_WEBHOOK_SECRET.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: Option<String>,
    /// Base URL of the Stripe API, overridable for local mocks.
    #[serde(default = "default_stripe_api_base_url")]
    pub api_base_url: String,
    pub success_url: String, // Mandatory
    pub cancel_url: String,  // Mandatory
    pub portal_return_url: String, // Mandatory
}

fn default_stripe_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

/// Usage limits attached to a plan. `None` means unlimited.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PlanLimits {
    pub max_specialties: Option<i64>,
    pub max_staff_users: Option<i64>,
    pub max_locations: Option<i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlanConfig {
    /// Internal plan identifier, e.g. "professional".
    pub id: String,
    pub name: String,
    /// Stripe price ids (monthly, yearly, ...) that activate this plan.
    #[serde(default)]
    pub stripe_price_ids: Vec<String>,
    #[serde(default)]
    pub limits: PlanLimits,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BillingConfig {
    #[serde(default)]
    pub plans: Vec<PlanConfig>,
    /// Limits applied when a tenant has no active subscription.
    #[serde(default)]
    pub free_plan: PlanLimits,
}

impl BillingConfig {
    /// Finds the configured plan a Stripe price id belongs to.
    pub fn plan_for_price(&self, price_id: &str) -> Option<&PlanConfig> {
        self.plans
            .iter()
            .find(|p| p.stripe_price_ids.iter().any(|id| id == price_id))
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_stripe: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    #[serde(default)]
    pub billing: BillingConfig,
}
