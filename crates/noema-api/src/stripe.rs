//! Stripe Checkout over the REST API.
//!
//! Only session creation is needed. Requests are form-encoded, authenticated
//! with the secret key as a bearer token, and errors are surfaced from
//! Stripe's `{"error": {"message": ...}}` body.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

const STRIPE_VERSION: &str = "2024-06-20";

#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

/// What the checkout handler asks Stripe for.
#[derive(Debug, Clone)]
pub struct CheckoutRequest<'a> {
    pub price: &'a str,
    pub plan: &'a str,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl StripeClient {
    pub fn new(http: reqwest::Client, secret_key: &str, api_base: &str) -> Self {
        Self {
            http,
            secret_key: secret_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Subscription-mode session with a single line item and promo codes on.
    pub async fn create_checkout_session(&self, req: &CheckoutRequest<'_>) -> Result<CheckoutSession> {
        let form = [
            ("mode", "subscription"),
            ("line_items[0][price]", req.price),
            ("line_items[0][quantity]", "1"),
            ("success_url", req.success_url.as_str()),
            ("cancel_url", req.cancel_url.as_str()),
            ("allow_promotion_codes", "true"),
            ("metadata[plan]", req.plan),
        ];

        let resp = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", STRIPE_VERSION)
            .form(&form)
            .send()
            .await
            .context("stripe request")?;

        let status = resp.status();
        let body = resp.text().await.context("read stripe response")?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("stripe returned {status}"));
            return Err(anyhow!(message));
        }
        serde_json::from_str(&body).context("decode checkout session")
    }
}
