// src/gateway/paypal.rs

//! PayPal Orders v2 REST adapter. Creates redirect-based checkouts (intent
//! CAPTURE, PAY_NOW, no shipping collection) and exposes the provider-side
//! capture call.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::gateway::{format_usd, CheckoutRequest, GatewayCapture, GatewayCheckout, PaymentGateway};

pub struct PayPalGateway {
  http: reqwest::Client,
  api_base: String,
  client_id: String,
  client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
  access_token: String,
}

#[derive(Debug, Deserialize)]
struct LinkDescription {
  rel: String,
  href: String,
}

#[derive(Debug, Deserialize)]
struct CreatedOrderResponse {
  id: String,
  #[serde(default)]
  links: Vec<LinkDescription>,
}

#[derive(Debug, Deserialize)]
struct CaptureResponse {
  id: String,
  status: String,
}

impl PayPalGateway {
  pub fn new(api_base: String, client_id: String, client_secret: String) -> Self {
    Self {
      http: reqwest::Client::new(),
      api_base,
      client_id,
      client_secret,
    }
  }

  /// Client-credentials OAuth exchange. A fresh token per call keeps the
  /// adapter stateless; PayPal tolerates this at storefront volumes.
  async fn access_token(&self) -> Result<String> {
    let response = self
      .http
      .post(format!("{}/v1/oauth2/token", self.api_base))
      .basic_auth(&self.client_id, Some(&self.client_secret))
      .form(&[("grant_type", "client_credentials")])
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("Token request failed: {}", e)))?;

    if !response.status().is_success() {
      return Err(AppError::Gateway(format!(
        "Token request rejected with status {}",
        response.status()
      )));
    }

    let token: TokenResponse = response
      .json()
      .await
      .map_err(|e| AppError::Gateway(format!("Malformed token response: {}", e)))?;
    Ok(token.access_token)
  }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
  #[instrument(name = "gateway::paypal_create_checkout", skip(self, request), fields(reference_id = %request.reference_id))]
  async fn create_checkout(&self, request: &CheckoutRequest) -> Result<GatewayCheckout> {
    let access_token = self.access_token().await?;

    let items: Vec<serde_json::Value> = request
      .items
      .iter()
      .map(|item| {
        json!({
          "name": item.title,
          "sku": item.product_id.to_string(),
          "unit_amount": {
            "currency_code": request.currency,
            "value": format_usd(item.unit_price_cents),
          },
          "quantity": item.quantity.to_string(),
        })
      })
      .collect();

    let item_total_cents: i64 = request.items.iter().map(|i| i.subtotal_cents()).sum();

    let body = json!({
      "intent": "CAPTURE",
      "purchase_units": [{
        "reference_id": request.reference_id,
        "amount": {
          "currency_code": request.currency,
          "value": format_usd(request.total_cents),
          "breakdown": {
            "item_total": {
              "currency_code": request.currency,
              "value": format_usd(item_total_cents),
            }
          }
        },
        "items": items,
      }],
      "application_context": {
        "brand_name": "Local Store",
        "shipping_preference": "NO_SHIPPING",
        "user_action": "PAY_NOW",
        "return_url": request.return_url,
        "cancel_url": request.cancel_url,
      }
    });

    let response = self
      .http
      .post(format!("{}/v2/checkout/orders", self.api_base))
      .bearer_auth(&access_token)
      .header("Prefer", "return=representation")
      .json(&body)
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("Create order request failed: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Gateway(format!(
        "Create order rejected with status {}: {}",
        status, detail
      )));
    }

    let created: CreatedOrderResponse = response
      .json()
      .await
      .map_err(|e| AppError::Gateway(format!("Malformed create order response: {}", e)))?;

    let approval_url = created
      .links
      .iter()
      .find(|link| link.rel == "approve")
      .map(|link| link.href.clone())
      .ok_or_else(|| AppError::Gateway("Create order response carried no approval link".to_string()))?;

    info!(payment_id = %created.id, "PayPal checkout created.");
    Ok(GatewayCheckout {
      payment_id: created.id,
      approval_url,
    })
  }

  #[instrument(name = "gateway::paypal_capture", skip(self))]
  async fn capture(&self, payment_id: &str) -> Result<GatewayCapture> {
    let access_token = self.access_token().await?;

    let response = self
      .http
      .post(format!("{}/v2/checkout/orders/{}/capture", self.api_base, payment_id))
      .bearer_auth(&access_token)
      .header("Content-Type", "application/json")
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("Capture request failed: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Gateway(format!(
        "Capture rejected with status {}: {}",
        status, detail
      )));
    }

    let captured: CaptureResponse = response
      .json()
      .await
      .map_err(|e| AppError::Gateway(format!("Malformed capture response: {}", e)))?;

    info!(payment_id = %captured.id, status = %captured.status, "PayPal capture completed.");
    Ok(GatewayCapture {
      payment_id: captured.id,
      status: captured.status,
    })
  }
}
