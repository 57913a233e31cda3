// --- File: crates/vetclinic_billing/tests/api_tests.rs ---
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::Arc;
use tower::ServiceExt;
use vetclinic_billing::routes;
use vetclinic_common::models::SubscriptionSync;
use vetclinic_config::{
    AppConfig, BillingConfig, DeploymentMode, PlanConfig, PlanLimits, ServerConfig, StripeConfig,
};
use vetclinic_db::{
    schema, CustomerRepository, DbClient, NewCustomer, SqlCustomerRepository,
    SqlSubscriptionRepository, SubscriptionRepository,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEBHOOK_SECRET: &str = "whsec_test_123";

fn app_config(stripe_base_url: Option<&str>) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: DeploymentMode::Development,
            log_level: None,
        },
        use_stripe: stripe_base_url.is_some(),
        database: None,
        stripe: stripe_base_url.map(|base| StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            api_base_url: base.to_string(),
            success_url: "https://app.example/billing/success".to_string(),
            cancel_url: "https://app.example/billing/cancel".to_string(),
            portal_return_url: "https://app.example/billing".to_string(),
        }),
        billing: BillingConfig {
            plans: vec![PlanConfig {
                id: "professional".to_string(),
                name: "Professional".to_string(),
                stripe_price_ids: vec!["price_pro_monthly".to_string()],
                limits: PlanLimits {
                    max_specialties: Some(25),
                    max_staff_users: Some(10),
                    max_locations: Some(2),
                },
            }],
            free_plan: PlanLimits {
                max_specialties: Some(3),
                max_staff_users: Some(1),
                max_locations: Some(1),
            },
        },
    })
}

async fn setup(stripe_base_url: Option<&str>) -> (Router, DbClient) {
    let db = DbClient::from_url("sqlite::memory:").await.unwrap();
    schema::init_schema(&db).await.unwrap();
    (routes(app_config(stripe_base_url), db.clone()), db)
}

async fn add_customer(db: &DbClient, tenant_id: i64, stripe_customer_id: &str) {
    SqlCustomerRepository::new(db.clone())
        .create(NewCustomer {
            tenant_id,
            stripe_customer_id: stripe_customer_id.to_string(),
            email: None,
            name: None,
        })
        .await
        .unwrap();
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-tenant-id", "1")
        .header("x-user-permissions", "billing.*")
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();
    read(app.clone().oneshot(request).await.unwrap()).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn stripe_signature(payload: &str, timestamp: i64, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

async fn post_webhook(app: &Router, payload: &str, signature: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/stripe/webhook")
        .header("stripe-signature", signature)
        .body(Body::from(payload.to_string()))
        .unwrap();
    read(app.clone().oneshot(request).await.unwrap()).await
}

#[tokio::test]
async fn test_checkout_creates_customer_once_and_returns_session() {
    let stripe = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(body_string_contains("metadata%5Btenant_id%5D=1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "cus_123", "email": "front@clinic.example"})),
        )
        .expect(1)
        .mount(&stripe)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains("price_pro_monthly"))
        .and(body_string_contains("customer=cus_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": "https://checkout.stripe.com/c/pay/cs_test_1"
        })))
        .expect(2)
        .mount(&stripe)
        .await;

    let (app, db) = setup(Some(&stripe.uri())).await;
    let body = json!({"price_id": "price_pro_monthly", "email": "front@clinic.example"});

    let (status, response) = call(&app, "POST", "/checkout", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["session_id"], "cs_test_1");
    assert_eq!(response["data"]["url"], "https://checkout.stripe.com/c/pay/cs_test_1");

    // The stored customer is reused the second time.
    let (status, _) = call(&app, "POST", "/checkout", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let customer = SqlCustomerRepository::new(db)
        .find_by_tenant(1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.stripe_customer_id, "cus_123");
}

#[tokio::test]
async fn test_checkout_without_price_id_is_rejected() {
    let (app, _db) = setup(None).await;

    let (status, body) = call(&app, "POST", "/checkout", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "price_id is required");

    let (status, _) = call(&app, "POST", "/checkout", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stripe_routes_are_unavailable_when_disabled() {
    let (app, _db) = setup(None).await;

    let (status, body) = call(&app, "GET", "/prices", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Billing is not enabled");

    let (status, _) = call(&app, "POST", "/checkout", Some(json!({"price_id": "price_1"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Plan limits come from the database only.
    let (status, body) = call(&app, "GET", "/plan-limits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plan"]["plan_id"], "free");
    assert_eq!(body["data"]["plan"]["limits"]["max_specialties"], 3);
    assert_eq!(body["data"]["usage"]["specialties"], 0);
}

#[tokio::test]
async fn test_portal_requires_billing_account_and_configuration() {
    let stripe = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "message": "No configuration provided and your test mode default configuration has not been created. Provide a configuration or create your default by saving your customer portal settings in test mode."
            }
        })))
        .mount(&stripe)
        .await;
    let (app, db) = setup(Some(&stripe.uri())).await;

    let (status, body) = call(&app, "POST", "/billing-portal", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No billing account found for this clinic");

    add_customer(&db, 1, "cus_portal").await;
    let (status, body) = call(&app, "POST", "/billing-portal", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("https://dashboard.stripe.com/settings/billing/portal"));
}

#[tokio::test]
async fn test_portal_returns_session_url() {
    let stripe = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .and(body_string_contains("customer=cus_portal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "bps_1",
            "url": "https://billing.stripe.com/session/bps_1"
        })))
        .mount(&stripe)
        .await;
    let (app, db) = setup(Some(&stripe.uri())).await;
    add_customer(&db, 1, "cus_portal").await;

    let (status, body) = call(&app, "POST", "/billing-portal", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], "https://billing.stripe.com/session/bps_1");
}

#[tokio::test]
async fn test_invoices_are_scoped_to_the_tenant_customer() {
    let stripe = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "has_more": false,
            "data": [{
                "id": "in_own",
                "customer": "cus_own",
                "status": "paid",
                "amount_due": 4900,
                "amount_paid": 4900,
                "currency": "usd"
            }]
        })))
        .mount(&stripe)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices/in_foreign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "in_foreign",
            "customer": "cus_someone_else",
            "amount_due": 100
        })))
        .mount(&stripe)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/invoices/in_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "resource_missing", "message": "No such invoice: 'in_missing'"}
        })))
        .mount(&stripe)
        .await;
    let (app, db) = setup(Some(&stripe.uri())).await;

    // No billing account yet: an empty list rather than an error.
    let (status, body) = call(&app, "GET", "/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["invoices"], json!([]));

    add_customer(&db, 1, "cus_own").await;
    let (status, body) = call(&app, "GET", "/invoices?limit=500", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["invoices"][0]["id"], "in_own");
    assert_eq!(body["data"]["has_more"], false);

    let (status, body) = call(&app, "GET", "/invoices/in_foreign", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invoice not found");

    let (status, _) = call(&app, "GET", "/invoices/in_missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Ids that are not plain Stripe ids never reach Stripe.
    let (status, body) = call(&app, "GET", "/invoices/in_own%2F..%2F..%2Fcustomers", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Invoice not found");
    let (status, _) = call(&app, "GET", "/invoices/in_own%3Fexpand", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The list call was clamped to Stripe's maximum page size.
    let requests = stripe.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path().starts_with("/v1/invoices")));
    assert!(!requests.iter().any(|r| r.url.path().contains("customers")));
    let list_call = requests
        .iter()
        .find(|r| r.url.path() == "/v1/invoices")
        .unwrap();
    assert!(list_call.url.query().unwrap().contains("limit=100"));
}

#[tokio::test]
async fn test_prices_are_annotated_with_plans() {
    let stripe = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "has_more": false,
            "data": [
                {
                    "id": "price_pro_monthly",
                    "active": true,
                    "currency": "usd",
                    "unit_amount": 4900,
                    "nickname": "Pro monthly",
                    "recurring": {"interval": "month", "interval_count": 1},
                    "product": {"id": "prod_pro", "name": "Professional", "description": "For growing clinics"}
                },
                {
                    "id": "price_legacy",
                    "active": true,
                    "currency": "usd",
                    "unit_amount": 2900,
                    "recurring": {"interval": "month", "interval_count": 1},
                    "product": "prod_legacy"
                }
            ]
        })))
        .mount(&stripe)
        .await;
    let (app, _db) = setup(Some(&stripe.uri())).await;

    let (status, body) = call(&app, "GET", "/prices", None).await;
    assert_eq!(status, StatusCode::OK);
    let prices = body["data"].as_array().unwrap();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0]["plan_id"], "professional");
    assert_eq!(prices[0]["product_name"], "Professional");
    assert_eq!(prices[0]["interval"], "month");
    assert_eq!(prices[1]["plan_id"], Value::Null);
    assert_eq!(prices[1]["product_id"], "prod_legacy");
}

#[tokio::test]
async fn test_plan_limits_follow_active_subscription() {
    let (app, db) = setup(None).await;
    add_customer(&db, 1, "cus_plan").await;
    let customer = SqlCustomerRepository::new(db.clone())
        .find_by_tenant(1)
        .await
        .unwrap()
        .unwrap();
    SqlSubscriptionRepository::new(db)
        .upsert(SubscriptionSync {
            tenant_id: 1,
            customer_id: customer.id,
            stripe_subscription_id: "sub_plan".to_string(),
            stripe_price_id: Some("price_pro_monthly".to_string()),
            status: "trialing".to_string(),
            amount: 4900,
            currency: "usd".to_string(),
            interval: "month".to_string(),
            current_period_end: None,
            cancel_at_period_end: false,
        })
        .await
        .unwrap();

    let (status, body) = call(&app, "GET", "/plan-limits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plan"]["plan_id"], "professional");
    assert_eq!(body["data"]["plan"]["subscription_status"], "trialing");
    assert_eq!(body["data"]["plan"]["limits"]["max_specialties"], 25);
}

#[tokio::test]
async fn test_webhook_syncs_subscription_with_valid_signature() {
    let stripe = MockServer::start().await;
    let (app, db) = setup(Some(&stripe.uri())).await;
    add_customer(&db, 1, "cus_hook").await;

    let payload = json!({
        "id": "evt_1",
        "type": "customer.subscription.created",
        "data": {"object": {
            "id": "sub_hook",
            "customer": "cus_hook",
            "status": "active",
            "cancel_at_period_end": false,
            "current_period_end": Utc::now().timestamp() + 86_400,
            "items": {"data": [{
                "quantity": 1,
                "price": {
                    "id": "price_pro_monthly",
                    "currency": "usd",
                    "unit_amount": 4900,
                    "recurring": {"interval": "month", "interval_count": 1}
                }
            }]}
        }}
    })
    .to_string();

    let signature = stripe_signature(&payload, Utc::now().timestamp(), WEBHOOK_SECRET);
    let (status, body) = post_webhook(&app, &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": {"received": true, "handled": true}}));

    let synced = SqlSubscriptionRepository::new(db)
        .list_for_tenant(1)
        .await
        .unwrap();
    assert_eq!(synced.len(), 1);
    let subscription = &synced[0];
    assert_eq!(subscription.stripe_subscription_id, "sub_hook");
    assert_eq!(subscription.status, "active");
    assert_eq!(subscription.amount, 4900);
}

#[tokio::test]
async fn test_webhook_rejects_bad_signatures_and_acknowledges_other_events() {
    let stripe = MockServer::start().await;
    let (app, _db) = setup(Some(&stripe.uri())).await;
    let payload = json!({"id": "evt_2", "type": "invoice.paid", "data": {"object": {}}}).to_string();

    let forged = stripe_signature(&payload, Utc::now().timestamp(), "whsec_wrong");
    let (status, body) = post_webhook(&app, &payload, &forged).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid signature"));

    let stale = stripe_signature(&payload, Utc::now().timestamp() - 3_600, WEBHOOK_SECRET);
    let (status, _) = post_webhook(&app, &payload, &stale).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let valid = stripe_signature(&payload, Utc::now().timestamp(), WEBHOOK_SECRET);
    let (status, body) = post_webhook(&app, &payload, &valid).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["handled"], false);
}
