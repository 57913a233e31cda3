// --- File: crates/vetclinic_billing/src/client.rs ---

//! Minimal Stripe REST client: form-encoded requests authenticated with the
//! secret key, JSON responses decoded into the few fields the billing
//! controllers use.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vetclinic_common::{create_client, DEFAULT_TIMEOUT_SECS};
use vetclinic_config::StripeConfig;

use crate::error::BillingError;

#[derive(Clone)]
pub struct StripeClient {
    http: Client,
    secret_key: String,
    base_url: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret key stays out of logs.
        f.debug_struct("StripeClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// --- Stripe objects (only the fields we read) ---

#[derive(Deserialize, Debug, Clone)]
pub struct StripeList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripePortalSession {
    pub id: String,
    pub url: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StripeInvoice {
    pub id: String,
    pub number: Option<String>,
    pub customer: Option<String>,
    /// draft, open, paid, uncollectible or void
    pub status: Option<String>,
    #[serde(default)]
    pub amount_due: i64,
    #[serde(default)]
    pub amount_paid: i64,
    pub currency: Option<String>,
    pub created: Option<i64>,
    pub period_start: Option<i64>,
    pub period_end: Option<i64>,
    pub hosted_invoice_url: Option<String>,
    pub invoice_pdf: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StripeRecurring {
    pub interval: String,
    pub interval_count: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StripeProduct {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// `product` is an id unless the request expanded it.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum StripeProductRef {
    Id(String),
    Object(StripeProduct),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StripePrice {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    pub currency: String,
    pub unit_amount: Option<i64>,
    pub nickname: Option<String>,
    pub recurring: Option<StripeRecurring>,
    pub product: StripeProductRef,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Result<Self, BillingError> {
        if config.secret_key.is_empty() {
            return Err(BillingError::Disabled);
        }
        Ok(Self {
            http: create_client(DEFAULT_TIMEOUT_SECS, true)?,
            secret_key: config.secret_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends an authenticated request and decodes the JSON body.
    ///
    /// Non-2xx answers become [`BillingError::ApiError`] carrying Stripe's
    /// `error.message` and `error.code` when present.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BillingError> {
        let response = request
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;
        debug!("[Stripe] response status: {}", status);

        if status.is_success() {
            return Ok(serde_json::from_str(&body_text)?);
        }

        let (message, code) = match serde_json::from_str::<serde_json::Value>(&body_text) {
            Ok(json_body) => {
                let error = json_body.get("error");
                let message = error
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or(&body_text)
                    .to_string();
                let code = error
                    .and_then(|e| e.get("code"))
                    .and_then(|c| c.as_str())
                    .map(str::to_string);
                (message, code)
            }
            Err(_) => (body_text, None),
        };
        warn!(
            "[Stripe] request failed with HTTP status {}: {}",
            status, message
        );
        Err(BillingError::ApiError {
            status_code: status.as_u16(),
            message,
            code,
        })
    }

    pub async fn create_customer(
        &self,
        tenant_id: i64,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<StripeCustomer, BillingError> {
        let mut form_body: Vec<(String, String)> =
            vec![("metadata[tenant_id]".to_string(), tenant_id.to_string())];
        if let Some(email) = email {
            form_body.push(("email".to_string(), email.to_string()));
        }
        if let Some(name) = name {
            form_body.push(("name".to_string(), name.to_string()));
        }

        let customer: StripeCustomer = self
            .send(self.http.post(self.url("/v1/customers")).form(&form_body))
            .await?;
        info!(
            "[Stripe] created customer {} for tenant {}",
            customer.id, tenant_id
        );
        Ok(customer)
    }

    pub async fn create_checkout_session(
        &self,
        form_body: &[(String, String)],
    ) -> Result<StripeCheckoutSession, BillingError> {
        self.send(
            self.http
                .post(self.url("/v1/checkout/sessions"))
                .form(form_body),
        )
        .await
    }

    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<StripePortalSession, BillingError> {
        let form_body = [("customer", customer_id), ("return_url", return_url)];
        self.send(
            self.http
                .post(self.url("/v1/billing_portal/sessions"))
                .form(&form_body),
        )
        .await
    }

    pub async fn list_invoices(
        &self,
        customer_id: &str,
        limit: i64,
        starting_after: Option<&str>,
    ) -> Result<StripeList<StripeInvoice>, BillingError> {
        let mut params = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        if let Some(cursor) = starting_after {
            params.push(("starting_after".to_string(), cursor.to_string()));
        }
        self.send(self.http.get(self.url("/v1/invoices")).query(&params))
            .await
    }

    pub async fn retrieve_invoice(&self, invoice_id: &str) -> Result<StripeInvoice, BillingError> {
        self.send(
            self.http
                .get(self.url(&format!("/v1/invoices/{}", invoice_id))),
        )
        .await
    }

    /// Active recurring prices with their products expanded.
    pub async fn list_prices(&self) -> Result<StripeList<StripePrice>, BillingError> {
        let params = [
            ("active", "true"),
            ("type", "recurring"),
            ("expand[]", "data.product"),
            ("limit", "100"),
        ];
        self.send(self.http.get(self.url("/v1/prices")).query(&params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_product_may_be_id_or_object() {
        let expanded: StripePrice = serde_json::from_value(serde_json::json!({
            "id": "price_1",
            "active": true,
            "currency": "usd",
            "unit_amount": 4900,
            "recurring": {"interval": "month", "interval_count": 1},
            "product": {"id": "prod_1", "name": "Professional", "description": null}
        }))
        .unwrap();
        assert!(matches!(expanded.product, StripeProductRef::Object(ref p) if p.id == "prod_1"));

        let bare: StripePrice = serde_json::from_value(serde_json::json!({
            "id": "price_2",
            "currency": "usd",
            "unit_amount": null,
            "product": "prod_2"
        }))
        .unwrap();
        assert_eq!(bare.product, StripeProductRef::Id("prod_2".to_string()));
        assert!(!bare.active);
    }

    #[test]
    fn test_debug_hides_secret_key() {
        let client = StripeClient::new(&StripeConfig {
            secret_key: "sk_test_hidden".to_string(),
            webhook_secret: None,
            api_base_url: "http://localhost:12111/".to_string(),
            success_url: String::new(),
            cancel_url: String::new(),
            portal_return_url: String::new(),
        })
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk_test_hidden"));
        assert_eq!(client.url("/v1/prices"), "http://localhost:12111/v1/prices");
    }
}
