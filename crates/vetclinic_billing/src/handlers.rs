// --- File: crates/vetclinic_billing/src/handlers.rs ---
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vetclinic_common::plans::resolve_plan;
use vetclinic_common::{
    permissions, ApiResponse, AuthContext, JsonBody, Pagination, VetClinicError,
};
use vetclinic_config::{AppConfig, StripeConfig};
use vetclinic_db::{
    SpecialtyFilter, SpecialtyRepository, SqlCustomerRepository, SqlSpecialtyRepository,
    SqlSubscriptionRepository, SubscriptionRepository,
};

use crate::client::{StripeClient, StripeInvoice};
use crate::error::BillingError;
use crate::logic::{
    self, BillingPortalRequest, BillingPortalResponse, CheckoutSessionResponse,
    CreateCheckoutRequest, InvoiceListQuery, InvoiceListResponse, PlanLimitsResponse, PlanUsage,
    PriceOption, StripeEvent, WebhookAck,
};

pub const DEFAULT_INVOICE_LIMIT: i64 = 10;
pub const MAX_INVOICE_LIMIT: i64 = 100;

// --- State for Billing Handlers ---
#[derive(Clone)]
pub struct BillingState {
    pub config: Arc<AppConfig>,
    /// `None` when Stripe is switched off or not configured.
    pub stripe: Option<StripeClient>,
    pub customers: SqlCustomerRepository,
    pub subscriptions: SqlSubscriptionRepository,
    pub specialties: SqlSpecialtyRepository,
}

impl BillingState {
    fn stripe(&self) -> Result<(&StripeClient, &StripeConfig), BillingError> {
        match (&self.stripe, self.config.stripe.as_ref()) {
            (Some(client), Some(stripe_config)) if self.config.use_stripe => {
                Ok((client, stripe_config))
            }
            _ => Err(BillingError::Disabled),
        }
    }
}

/// `POST /checkout`: starts a subscription checkout for the caller's clinic.
#[axum::debug_handler]
pub async fn create_checkout_handler(
    State(state): State<Arc<BillingState>>,
    auth: AuthContext,
    JsonBody(payload): JsonBody<CreateCheckoutRequest>,
) -> Result<ApiResponse<CheckoutSessionResponse>, VetClinicError> {
    auth.require(permissions::BILLING_MANAGE)?;

    let price_id = logic::required_price_id(&payload)?;
    let (stripe, stripe_config) = state.stripe()?;

    let session = logic::create_checkout_session(
        stripe,
        stripe_config,
        &state.customers,
        &auth,
        payload,
        price_id,
    )
    .await?;
    Ok(ApiResponse::ok(session))
}

/// `POST /billing-portal`
#[axum::debug_handler]
pub async fn create_billing_portal_handler(
    State(state): State<Arc<BillingState>>,
    auth: AuthContext,
    JsonBody(payload): JsonBody<BillingPortalRequest>,
) -> Result<ApiResponse<BillingPortalResponse>, VetClinicError> {
    auth.require(permissions::BILLING_MANAGE)?;
    let (stripe, stripe_config) = state.stripe()?;

    let portal =
        logic::create_portal_session(stripe, stripe_config, &state.customers, &auth, payload)
            .await?;
    Ok(ApiResponse::ok(portal))
}

#[axum::debug_handler]
pub async fn list_invoices_handler(
    State(state): State<Arc<BillingState>>,
    auth: AuthContext,
    Query(query): Query<InvoiceListQuery>,
) -> Result<ApiResponse<InvoiceListResponse>, VetClinicError> {
    auth.require(permissions::BILLING_READ)?;
    let (stripe, _) = state.stripe()?;

    let page = Pagination::with_bounds(
        query.limit.as_deref(),
        None,
        DEFAULT_INVOICE_LIMIT,
        MAX_INVOICE_LIMIT,
    );
    let starting_after = query
        .starting_after
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let invoices =
        logic::list_invoices(stripe, &state.customers, &auth, page.limit, starting_after).await?;
    Ok(ApiResponse::ok(invoices))
}

#[axum::debug_handler]
pub async fn get_invoice_handler(
    State(state): State<Arc<BillingState>>,
    auth: AuthContext,
    Path(invoice_id): Path<String>,
) -> Result<ApiResponse<StripeInvoice>, VetClinicError> {
    auth.require(permissions::BILLING_READ)?;
    let (stripe, _) = state.stripe()?;

    let invoice = logic::get_invoice(stripe, &state.customers, &auth, invoice_id.trim()).await?;
    Ok(ApiResponse::ok(invoice))
}

/// `GET /prices`: the catalogue offered at checkout.
#[axum::debug_handler]
pub async fn list_prices_handler(
    State(state): State<Arc<BillingState>>,
    auth: AuthContext,
) -> Result<ApiResponse<Vec<PriceOption>>, VetClinicError> {
    auth.require(permissions::BILLING_READ)?;
    let (stripe, _) = state.stripe()?;

    let prices = logic::list_prices(stripe, &state.config.billing).await?;
    debug!("Returning {} prices", prices.len());
    Ok(ApiResponse::ok(prices))
}

/// `GET /plan-limits`: works without Stripe, from the synced subscriptions.
#[axum::debug_handler]
pub async fn plan_limits_handler(
    State(state): State<Arc<BillingState>>,
    auth: AuthContext,
) -> Result<ApiResponse<PlanLimitsResponse>, VetClinicError> {
    auth.require(permissions::BILLING_READ)?;

    let subscriptions = state.subscriptions.list_for_tenant(auth.tenant_id).await?;
    let plan = resolve_plan(&state.config.billing, &subscriptions);
    let specialties = state
        .specialties
        .count(auth.tenant_id, &SpecialtyFilter::default())
        .await?;

    Ok(ApiResponse::ok(PlanLimitsResponse {
        plan,
        usage: PlanUsage { specialties },
    }))
}

/// `POST /stripe/webhook`
///
/// Called by Stripe, so there is no tenant context; the signature is the
/// only authentication.
#[axum::debug_handler]
pub async fn stripe_webhook_handler(
    State(state): State<Arc<BillingState>>,
    headers: HeaderMap,
    body: String, // Raw body for signature verification
) -> Result<ApiResponse<WebhookAck>, VetClinicError> {
    if !state.config.use_stripe {
        return Err(BillingError::Disabled.into());
    }
    let webhook_secret = state
        .config
        .stripe
        .as_ref()
        .and_then(|s| s.webhook_secret.as_deref())
        .filter(|s| !s.is_empty())
        .ok_or(BillingError::WebhookNotConfigured)?;

    let sig_header = headers.get("Stripe-Signature").and_then(|h| h.to_str().ok());
    if let Err(e) =
        logic::verify_stripe_signature(body.as_bytes(), sig_header, webhook_secret, Utc::now())
    {
        warn!("Stripe webhook signature verification failed: {}", e);
        return Err(e.into());
    }

    let event: StripeEvent = serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to deserialize Stripe webhook event: {}", e);
        VetClinicError::ValidationError("Invalid payload format".to_string())
    })?;
    let event_id = event.id.clone();

    let outcome =
        logic::process_stripe_webhook(event, &state.customers, &state.subscriptions).await?;
    info!("Stripe webhook {} processed: {:?}", event_id, outcome);

    Ok(ApiResponse::ok(WebhookAck {
        received: true,
        handled: outcome.is_handled(),
    }))
}
