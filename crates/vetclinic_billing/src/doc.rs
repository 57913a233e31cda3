// --- File: crates/vetclinic_billing/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::client::StripeInvoice;
use crate::logic::{
    BillingPortalRequest, BillingPortalResponse, CheckoutSessionResponse, CreateCheckoutRequest,
    InvoiceListQuery, InvoiceListResponse, PlanLimitsResponse, PlanUsage, PriceOption,
    WebhookAck,
};
use vetclinic_common::plans::ResolvedPlan;
use vetclinic_config::PlanLimits;

#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CreateCheckoutRequest,
    responses(
        (status = 200, description = "Stripe Checkout Session created", body = CheckoutSessionResponse),
        (status = 400, description = "price_id is required, or Stripe rejected the request"),
        (status = 403, description = "Missing billing.manage permission"),
        (status = 502, description = "Stripe API error"),
        (status = 503, description = "Billing is not enabled")
    ),
    tag = "Billing"
)]
fn doc_create_checkout_handler() {}

#[utoipa::path(
    post,
    path = "/billing-portal",
    request_body = BillingPortalRequest,
    responses(
        (status = 200, description = "Customer portal session created", body = BillingPortalResponse),
        (status = 400, description = "Customer portal is not configured in Stripe"),
        (status = 404, description = "No billing account found for this clinic"),
        (status = 503, description = "Billing is not enabled")
    ),
    tag = "Billing"
)]
fn doc_create_billing_portal_handler() {}

#[utoipa::path(
    get,
    path = "/invoices",
    params(InvoiceListQuery),
    responses(
        (status = 200, description = "The clinic's invoices, newest first", body = InvoiceListResponse),
        (status = 503, description = "Billing is not enabled")
    ),
    tag = "Billing"
)]
fn doc_list_invoices_handler() {}

#[utoipa::path(
    get,
    path = "/invoices/{id}",
    params(("id" = String, Path, description = "Stripe invoice id")),
    responses(
        (status = 200, description = "The invoice", body = StripeInvoice),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Billing"
)]
fn doc_get_invoice_handler() {}

#[utoipa::path(
    get,
    path = "/prices",
    responses(
        (status = 200, description = "Active recurring prices", body = [PriceOption]),
        (status = 503, description = "Billing is not enabled")
    ),
    tag = "Billing"
)]
fn doc_list_prices_handler() {}

#[utoipa::path(
    get,
    path = "/plan-limits",
    responses(
        (status = 200, description = "Current plan, its limits and usage", body = PlanLimitsResponse)
    ),
    tag = "Billing"
)]
fn doc_plan_limits_handler() {}

#[utoipa::path(
    post,
    path = "/stripe/webhook",
    responses(
        (status = 200, description = "Webhook received and acknowledged", body = WebhookAck),
        (status = 400, description = "Invalid signature or payload"),
        (status = 500, description = "Webhook secret not configured")
    ),
    tag = "Stripe Webhooks"
)]
fn doc_stripe_webhook_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_checkout_handler,
        doc_create_billing_portal_handler,
        doc_list_invoices_handler,
        doc_get_invoice_handler,
        doc_list_prices_handler,
        doc_plan_limits_handler,
        doc_stripe_webhook_handler
    ),
    components(schemas(
        CreateCheckoutRequest,
        CheckoutSessionResponse,
        BillingPortalRequest,
        BillingPortalResponse,
        InvoiceListResponse,
        StripeInvoice,
        PriceOption,
        PlanLimitsResponse,
        PlanUsage,
        ResolvedPlan,
        PlanLimits,
        WebhookAck
    )),
    tags(
        (name = "Billing", description = "Stripe subscriptions for clinics"),
        (name = "Stripe Webhooks", description = "Events sent by Stripe")
    )
)]
pub struct BillingApiDoc;
