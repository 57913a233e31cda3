// --- File: crates/vetclinic_billing/src/routes.rs ---
use crate::client::StripeClient;
use crate::handlers::{
    create_billing_portal_handler, create_checkout_handler, get_invoice_handler,
    list_invoices_handler, list_prices_handler, plan_limits_handler, stripe_webhook_handler,
    BillingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{info, warn};
use vetclinic_config::AppConfig;
use vetclinic_db::{
    DbClient, SqlCustomerRepository, SqlSpecialtyRepository, SqlSubscriptionRepository,
};

/// Creates a router containing all routes for the billing feature.
///
/// The Stripe client is built once here; when Stripe is disabled the
/// Stripe-backed routes answer 503 while `/plan-limits` keeps working.
pub fn routes(config: Arc<AppConfig>, db: DbClient) -> Router {
    let stripe = match config.stripe.as_ref() {
        Some(stripe_config) if config.use_stripe => match StripeClient::new(stripe_config) {
            Ok(client) => {
                info!("Stripe billing enabled ({:?})", client);
                Some(client)
            }
            Err(e) => {
                warn!("Stripe billing disabled: {}", e);
                None
            }
        },
        _ => {
            info!("Stripe billing disabled by configuration");
            None
        }
    };

    let state = Arc::new(BillingState {
        config,
        stripe,
        customers: SqlCustomerRepository::new(db.clone()),
        subscriptions: SqlSubscriptionRepository::new(db.clone()),
        specialties: SqlSpecialtyRepository::new(db),
    });

    Router::new()
        .route("/checkout", post(create_checkout_handler))
        .route("/billing-portal", post(create_billing_portal_handler))
        .route("/invoices", get(list_invoices_handler))
        .route("/invoices/{id}", get(get_invoice_handler))
        .route("/prices", get(list_prices_handler))
        .route("/plan-limits", get(plan_limits_handler))
        .route("/stripe/webhook", post(stripe_webhook_handler))
        .with_state(state)
}
