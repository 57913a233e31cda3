// --- File: crates/vetclinic_billing/src/logic.rs ---
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, info, warn};
use vetclinic_common::models::{Customer, SubscriptionSync};
use vetclinic_common::plans::ResolvedPlan;
use vetclinic_common::AuthContext;
use vetclinic_config::{BillingConfig, StripeConfig};
use vetclinic_db::{CustomerRepository, NewCustomer, SubscriptionRepository};

use crate::client::{StripeClient, StripeInvoice, StripePrice, StripeProductRef};
use crate::error::BillingError;

/// Maximum age of a webhook signature timestamp.
pub const WEBHOOK_TOLERANCE_SECS: u64 = 300;

// --- Request / response bodies ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Default, Clone)]
pub struct CreateCheckoutRequest {
    pub price_id: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
    /// Used when a Stripe customer has to be created first.
    pub email: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub url: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Default, Clone)]
pub struct BillingPortalRequest {
    pub return_url: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BillingPortalResponse {
    pub url: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Deserialize, Debug, Default)]
pub struct InvoiceListQuery {
    /// 1 to 100, default 10
    pub limit: Option<String>,
    /// Invoice id to continue after
    pub starting_after: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvoiceListResponse {
    pub invoices: Vec<StripeInvoice>,
    pub has_more: bool,
}

/// A purchasable price, annotated with the plan it activates.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceOption {
    pub id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub nickname: Option<String>,
    pub unit_amount: Option<i64>,
    pub currency: String,
    pub interval: Option<String>,
    pub interval_count: Option<i64>,
    pub plan_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanUsage {
    pub specialties: i64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanLimitsResponse {
    pub plan: ResolvedPlan,
    pub usage: PlanUsage,
}

// --- Checkout ---

/// Returns the tenant's Stripe customer, creating it in Stripe and locally
/// on first use.
pub async fn ensure_customer<C: CustomerRepository + Sync>(
    stripe: &StripeClient,
    customers: &C,
    auth: &AuthContext,
    email: Option<&str>,
) -> Result<Customer, BillingError> {
    if let Some(existing) = customers.find_by_tenant(auth.tenant_id).await? {
        return Ok(existing);
    }

    let created = stripe.create_customer(auth.tenant_id, email, None).await?;
    let stored = customers
        .create(NewCustomer {
            tenant_id: auth.tenant_id,
            stripe_customer_id: created.id,
            email: created.email.or_else(|| email.map(str::to_string)),
            name: None,
        })
        .await;

    match stored {
        Ok(customer) => Ok(customer),
        // A concurrent checkout stored one first; use that.
        Err(e) if e.is_unique_violation() => customers
            .find_by_tenant(auth.tenant_id)
            .await?
            .ok_or(BillingError::Db(e)),
        Err(e) => Err(e.into()),
    }
}

/// Form body of a subscription-mode checkout session.
pub fn checkout_form(
    stripe_config: &StripeConfig,
    request: &CreateCheckoutRequest,
    price_id: &str,
    customer: &Customer,
) -> Vec<(String, String)> {
    let tenant_id = customer.tenant_id.to_string();
    let success_url = request
        .success_url
        .clone()
        .unwrap_or_else(|| stripe_config.success_url.clone());
    let cancel_url = request
        .cancel_url
        .clone()
        .unwrap_or_else(|| stripe_config.cancel_url.clone());

    vec![
        ("mode".to_string(), "subscription".to_string()),
        ("customer".to_string(), customer.stripe_customer_id.clone()),
        ("line_items[0][price]".to_string(), price_id.to_string()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("success_url".to_string(), success_url),
        ("cancel_url".to_string(), cancel_url),
        ("client_reference_id".to_string(), tenant_id.clone()),
        ("metadata[tenant_id]".to_string(), tenant_id.clone()),
        (
            "subscription_data[metadata][tenant_id]".to_string(),
            tenant_id,
        ),
    ]
}

/// Trimmed, non-empty `price_id` or a validation error.
pub fn required_price_id(request: &CreateCheckoutRequest) -> Result<String, BillingError> {
    request
        .price_id
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BillingError::Validation("price_id is required".to_string()))
}

pub async fn create_checkout_session<C: CustomerRepository + Sync>(
    stripe: &StripeClient,
    stripe_config: &StripeConfig,
    customers: &C,
    auth: &AuthContext,
    request: CreateCheckoutRequest,
    price_id: String,
) -> Result<CheckoutSessionResponse, BillingError> {
    let customer = ensure_customer(stripe, customers, auth, request.email.as_deref()).await?;
    let form_body = checkout_form(stripe_config, &request, &price_id, &customer);

    info!(
        "[Billing] Creating checkout session for tenant {} (price {})",
        auth.tenant_id, price_id
    );
    let session = stripe.create_checkout_session(&form_body).await?;
    let url = session.url.ok_or_else(|| {
        BillingError::UnexpectedResponse("checkout session without URL".to_string())
    })?;

    Ok(CheckoutSessionResponse {
        session_id: session.id,
        url,
    })
}

// --- Portal ---

pub async fn create_portal_session<C: CustomerRepository + Sync>(
    stripe: &StripeClient,
    stripe_config: &StripeConfig,
    customers: &C,
    auth: &AuthContext,
    request: BillingPortalRequest,
) -> Result<BillingPortalResponse, BillingError> {
    let customer = customers
        .find_by_tenant(auth.tenant_id)
        .await?
        .ok_or(BillingError::NoBillingAccount)?;

    let return_url = request
        .return_url
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| stripe_config.portal_return_url.clone());

    match stripe
        .create_portal_session(&customer.stripe_customer_id, &return_url)
        .await
    {
        Ok(session) => Ok(BillingPortalResponse { url: session.url }),
        Err(e) if e.is_portal_not_configured() => {
            warn!("[Billing] Stripe customer portal is not configured: {}", e);
            Err(BillingError::PortalNotConfigured)
        }
        Err(e) => Err(e),
    }
}

// --- Invoices ---

pub async fn list_invoices<C: CustomerRepository + Sync>(
    stripe: &StripeClient,
    customers: &C,
    auth: &AuthContext,
    limit: i64,
    starting_after: Option<&str>,
) -> Result<InvoiceListResponse, BillingError> {
    let Some(customer) = customers.find_by_tenant(auth.tenant_id).await? else {
        return Ok(InvoiceListResponse {
            invoices: Vec::new(),
            has_more: false,
        });
    };

    let list = stripe
        .list_invoices(&customer.stripe_customer_id, limit, starting_after)
        .await?;
    Ok(InvoiceListResponse {
        invoices: list.data,
        has_more: list.has_more,
    })
}

/// Fetches one invoice, treating invoices of other customers as missing.
/// Stripe object ids are `<prefix>_<alphanumerics>`.
pub fn is_stripe_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

pub async fn get_invoice<C: CustomerRepository + Sync>(
    stripe: &StripeClient,
    customers: &C,
    auth: &AuthContext,
    invoice_id: &str,
) -> Result<StripeInvoice, BillingError> {
    if !is_stripe_id(invoice_id) {
        return Err(BillingError::InvoiceNotFound);
    }
    let customer = customers
        .find_by_tenant(auth.tenant_id)
        .await?
        .ok_or(BillingError::InvoiceNotFound)?;

    let invoice = match stripe.retrieve_invoice(invoice_id).await {
        Ok(invoice) => invoice,
        Err(e) if e.is_not_found() => return Err(BillingError::InvoiceNotFound),
        Err(e) => return Err(e),
    };

    if invoice.customer.as_deref() != Some(customer.stripe_customer_id.as_str()) {
        warn!(
            "[Billing] Tenant {} requested invoice {} of another customer",
            auth.tenant_id, invoice_id
        );
        return Err(BillingError::InvoiceNotFound);
    }
    Ok(invoice)
}

// --- Prices ---

pub fn to_price_option(price: StripePrice, billing: &BillingConfig) -> PriceOption {
    let (product_id, product_name, product_description) = match price.product {
        StripeProductRef::Id(id) => (id, None, None),
        StripeProductRef::Object(product) => (product.id, product.name, product.description),
    };
    let plan_id = billing.plan_for_price(&price.id).map(|plan| plan.id.clone());

    PriceOption {
        product_id,
        product_name,
        product_description,
        nickname: price.nickname,
        unit_amount: price.unit_amount,
        currency: price.currency,
        interval: price.recurring.as_ref().map(|r| r.interval.clone()),
        interval_count: price.recurring.as_ref().and_then(|r| r.interval_count),
        plan_id,
        id: price.id,
    }
}

pub async fn list_prices(
    stripe: &StripeClient,
    billing: &BillingConfig,
) -> Result<Vec<PriceOption>, BillingError> {
    let prices = stripe.list_prices().await?;
    Ok(prices
        .data
        .into_iter()
        .filter(|p| p.active)
        .map(|p| to_price_option(p, billing))
        .collect())
}

// --- Webhook ---

/// Verifies a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=...]`).
///
/// The signed payload is `"<t>.<body>"`, HMAC-SHA256 with the endpoint
/// secret. Timestamps further than [`WEBHOOK_TOLERANCE_SECS`] from `now`
/// are rejected.
pub fn verify_stripe_signature(
    payload_bytes: &[u8],
    sig_header: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<(), BillingError> {
    let sig_header_value = sig_header.ok_or_else(|| {
        BillingError::WebhookSignatureError("Missing Stripe-Signature header".to_string())
    })?;

    let mut timestamp_str: Option<&str> = None;
    let mut v1_signatures_hex: Vec<&str> = Vec::new();
    for item in sig_header_value.split(',') {
        match item.trim().split_once('=') {
            Some(("t", value)) => timestamp_str = Some(value),
            Some(("v1", value)) => v1_signatures_hex.push(value),
            _ => {} // v0 and unknown schemes are ignored
        }
    }

    let timestamp_str = timestamp_str.ok_or_else(|| {
        BillingError::WebhookSignatureError("Missing timestamp 't' in Stripe-Signature".to_string())
    })?;
    let parsed_timestamp = timestamp_str.parse::<i64>().map_err(|_| {
        BillingError::WebhookSignatureError(
            "Invalid timestamp format in Stripe-Signature".to_string(),
        )
    })?;
    if v1_signatures_hex.is_empty() {
        return Err(BillingError::WebhookSignatureError(
            "Missing v1 signature in Stripe-Signature".to_string(),
        ));
    }

    if now.timestamp().abs_diff(parsed_timestamp) > WEBHOOK_TOLERANCE_SECS {
        return Err(BillingError::WebhookSignatureError(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        BillingError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(timestamp_str.as_bytes());
    mac.update(b".");
    mac.update(payload_bytes);

    let matched = v1_signatures_hex.iter().any(|provided_hex| {
        hex::decode(provided_hex)
            .map(|provided| mac.clone().verify_slice(&provided).is_ok())
            .unwrap_or(false)
    });
    if matched {
        Ok(())
    } else {
        Err(BillingError::WebhookSignatureError(
            "Signature mismatch".to_string(),
        ))
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
pub struct StripeEventData {
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub object: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeSubscriptionObject {
    pub id: String,
    pub customer: String,
    pub status: String,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    pub current_period_end: Option<i64>,
    pub items: StripeSubscriptionItems,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeSubscriptionItems {
    #[serde(default)]
    pub data: Vec<StripeSubscriptionItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeSubscriptionItem {
    pub price: StripeSubscriptionPrice,
    pub quantity: Option<i64>,
    /// Newer API versions report the period per item.
    pub current_period_end: Option<i64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeSubscriptionPrice {
    pub id: String,
    pub currency: String,
    pub unit_amount: Option<i64>,
    pub recurring: Option<crate::client::StripeRecurring>,
}

/// What a webhook delivery did, for logging and the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    SubscriptionSynced { stripe_subscription_id: String },
    UnknownCustomer { stripe_customer_id: String },
    Ignored { event_type: String },
}

impl WebhookOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, WebhookOutcome::SubscriptionSynced { .. })
    }
}

/// Body of a successful webhook delivery.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WebhookAck {
    pub received: bool,
    /// `false` for events that do not touch subscriptions.
    pub handled: bool,
}

/// Turns a Stripe subscription into the row for `customer`.
pub fn subscription_sync(
    subscription: &StripeSubscriptionObject,
    customer: &Customer,
    deleted: bool,
) -> SubscriptionSync {
    let item = subscription.items.data.first();
    let quantity = item.and_then(|i| i.quantity).unwrap_or(1);
    let amount = item
        .and_then(|i| i.price.unit_amount)
        .unwrap_or(0)
        * quantity;
    let period_end = subscription
        .current_period_end
        .or_else(|| item.and_then(|i| i.current_period_end))
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    SubscriptionSync {
        tenant_id: customer.tenant_id,
        customer_id: customer.id,
        stripe_subscription_id: subscription.id.clone(),
        stripe_price_id: item.map(|i| i.price.id.clone()),
        status: if deleted {
            "canceled".to_string()
        } else {
            subscription.status.clone()
        },
        amount,
        currency: item
            .map(|i| i.price.currency.to_lowercase())
            .unwrap_or_else(|| "usd".to_string()),
        interval: item
            .and_then(|i| i.price.recurring.as_ref())
            .map(|r| r.interval.clone())
            .unwrap_or_else(|| "month".to_string()),
        current_period_end: period_end,
        cancel_at_period_end: subscription.cancel_at_period_end,
    }
}

/// Applies a verified event. Subscription lifecycle events are mirrored
/// into the subscriptions table; everything else is acknowledged.
pub async fn process_stripe_webhook<C, S>(
    event: StripeEvent,
    customers: &C,
    subscriptions: &S,
) -> Result<WebhookOutcome, BillingError>
where
    C: CustomerRepository + Sync,
    S: SubscriptionRepository + Sync,
{
    let deleted = match event.event_type.as_str() {
        "customer.subscription.created" | "customer.subscription.updated" => false,
        "customer.subscription.deleted" => true,
        other => {
            debug!("[Billing] Ignoring Stripe event {} ({})", event.id, other);
            return Ok(WebhookOutcome::Ignored {
                event_type: other.to_string(),
            });
        }
    };

    let subscription: StripeSubscriptionObject = serde_json::from_value(event.data.object)
        .map_err(|e| BillingError::Validation(format!("Invalid subscription object: {}", e)))?;
    let Some(customer) = customers.find_by_stripe_id(&subscription.customer).await? else {
        warn!(
            "[Billing] Event {} references unknown customer {}",
            event.id, subscription.customer
        );
        return Ok(WebhookOutcome::UnknownCustomer {
            stripe_customer_id: subscription.customer,
        });
    };

    let stored = subscriptions
        .upsert(subscription_sync(&subscription, &customer, deleted))
        .await?;
    info!(
        "[Billing] Event {} synced subscription {} for tenant {}",
        event.id, stored.stripe_subscription_id, stored.tenant_id
    );
    Ok(WebhookOutcome::SubscriptionSynced {
        stripe_subscription_id: stored.stripe_subscription_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &str, timestamp: i64, secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, payload).as_bytes());
        format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let now = Utc::now();
        let payload = r#"{"id":"evt_1","type":"invoice.paid"}"#;
        let header = sign(payload, now.timestamp(), SECRET);
        assert!(verify_stripe_signature(payload.as_bytes(), Some(&header), SECRET, now).is_ok());

        // Extra v0/v1 entries do not hurt as long as one v1 matches.
        let header = format!("{},v1=deadbeef,v0=abc", header);
        assert!(verify_stripe_signature(payload.as_bytes(), Some(&header), SECRET, now).is_ok());
    }

    #[test]
    fn test_invalid_signatures_are_rejected() {
        let now = Utc::now();
        let payload = r#"{"id":"evt_1"}"#;

        let wrong_secret = sign(payload, now.timestamp(), "whsec_other");
        assert!(verify_stripe_signature(payload.as_bytes(), Some(&wrong_secret), SECRET, now).is_err());

        let tampered = sign(payload, now.timestamp(), SECRET);
        assert!(verify_stripe_signature(b"{\"id\":\"evt_2\"}", Some(&tampered), SECRET, now).is_err());

        let stale = sign(payload, now.timestamp() - WEBHOOK_TOLERANCE_SECS as i64 - 1, SECRET);
        assert!(verify_stripe_signature(payload.as_bytes(), Some(&stale), SECRET, now).is_err());

        assert!(verify_stripe_signature(payload.as_bytes(), None, SECRET, now).is_err());
        assert!(verify_stripe_signature(payload.as_bytes(), Some("v1=abc"), SECRET, now).is_err());
        assert!(verify_stripe_signature(payload.as_bytes(), Some("t=123"), SECRET, now).is_err());
    }

    #[test]
    fn test_stripe_id_shape() {
        assert!(is_stripe_id("in_1NxY2ZLkdIwHu7ix"));
        assert!(!is_stripe_id(""));
        assert!(!is_stripe_id("in_1/../customers"));
        assert!(!is_stripe_id("in_1?expand[]=customer"));
        assert!(!is_stripe_id("in_1%2Fcustomers"));
    }

    #[test]
    fn test_extreme_timestamps_are_rejected() {
        let now = Utc::now();
        for header in [
            "t=-9223372036854775000,v1=00",
            "t=-9223372036854775808,v1=00",
            "t=9223372036854775807,v1=00",
        ] {
            let err = verify_stripe_signature(b"{}", Some(header), SECRET, now).unwrap_err();
            assert!(matches!(err, BillingError::WebhookSignatureError(_)));
        }
    }

    fn customer() -> Customer {
        Customer {
            id: 7,
            tenant_id: 3,
            stripe_customer_id: "cus_1".to_string(),
            email: None,
            name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_subscription_sync_mapping() {
        let subscription: StripeSubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": "active",
            "cancel_at_period_end": true,
            "items": {"data": [{
                "quantity": 2,
                "current_period_end": 1893456000,
                "price": {
                    "id": "price_pro_yearly",
                    "currency": "EUR",
                    "unit_amount": 48000,
                    "recurring": {"interval": "year", "interval_count": 1}
                }
            }]}
        }))
        .unwrap();

        let sync = subscription_sync(&subscription, &customer(), false);
        assert_eq!(sync.tenant_id, 3);
        assert_eq!(sync.customer_id, 7);
        assert_eq!(sync.amount, 96000);
        assert_eq!(sync.currency, "eur");
        assert_eq!(sync.interval, "year");
        assert_eq!(sync.stripe_price_id.as_deref(), Some("price_pro_yearly"));
        assert_eq!(sync.current_period_end.map(|d| d.timestamp()), Some(1893456000));
        assert!(sync.cancel_at_period_end);

        let deleted = subscription_sync(&subscription, &customer(), true);
        assert_eq!(deleted.status, "canceled");
    }

    #[test]
    fn test_checkout_form_carries_tenant_metadata() {
        let config = StripeConfig {
            secret_key: "sk_test".to_string(),
            webhook_secret: None,
            api_base_url: "https://api.stripe.com".to_string(),
            success_url: "https://app/success".to_string(),
            cancel_url: "https://app/cancel".to_string(),
            portal_return_url: "https://app/billing".to_string(),
        };
        let request = CreateCheckoutRequest {
            price_id: Some("price_1".to_string()),
            cancel_url: Some("https://app/custom-cancel".to_string()),
            ..Default::default()
        };
        let form = checkout_form(&config, &request, "price_1", &customer());
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("mode"), Some("subscription"));
        assert_eq!(get("customer"), Some("cus_1"));
        assert_eq!(get("line_items[0][price]"), Some("price_1"));
        assert_eq!(get("success_url"), Some("https://app/success"));
        assert_eq!(get("cancel_url"), Some("https://app/custom-cancel"));
        assert_eq!(get("metadata[tenant_id]"), Some("3"));
        assert_eq!(get("subscription_data[metadata][tenant_id]"), Some("3"));
    }

    #[test]
    fn test_required_price_id() {
        let missing = CreateCheckoutRequest::default();
        assert!(matches!(
            required_price_id(&missing),
            Err(BillingError::Validation(msg)) if msg == "price_id is required"
        ));
        let blank = CreateCheckoutRequest {
            price_id: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(required_price_id(&blank).is_err());
    }
}
