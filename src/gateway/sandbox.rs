// src/gateway/sandbox.rs

//! Offline stand-in for the payment provider. Hands back deterministic-shape
//! identifiers and a fake approval URL so the checkout flow can run end to end
//! without network access. Used by the test suite and local development.

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::gateway::{CheckoutRequest, GatewayCapture, GatewayCheckout, PaymentGateway};

#[derive(Debug, Default)]
pub struct SandboxGateway;

impl SandboxGateway {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
  #[instrument(name = "gateway::sandbox_create_checkout", skip(self, request), fields(reference_id = %request.reference_id))]
  async fn create_checkout(&self, request: &CheckoutRequest) -> Result<GatewayCheckout> {
    if request.total_cents <= 0 {
      return Err(AppError::Gateway("Amount must be greater than zero".to_string()));
    }
    if request.items.is_empty() {
      return Err(AppError::Gateway("Checkout requires at least one item".to_string()));
    }

    let payment_id = format!("sandbox_pay_{}", Uuid::new_v4().simple());
    info!(payment_id = %payment_id, "Sandbox checkout created.");
    Ok(GatewayCheckout {
      approval_url: format!("https://sandbox.gateway.invalid/approve/{}", payment_id),
      payment_id,
    })
  }

  #[instrument(name = "gateway::sandbox_capture", skip(self))]
  async fn capture(&self, payment_id: &str) -> Result<GatewayCapture> {
    Ok(GatewayCapture {
      payment_id: payment_id.to_string(),
      status: "COMPLETED".to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::OrderItem;

  fn request(total_cents: i64, items: Vec<OrderItem>) -> CheckoutRequest {
    CheckoutRequest {
      reference_id: "ref-1".to_string(),
      items,
      total_cents,
      currency: "USD".to_string(),
      return_url: "http://localhost/shop/paypal-return".to_string(),
      cancel_url: "http://localhost/shop/paypal-cancel".to_string(),
    }
  }

  fn one_item() -> OrderItem {
    OrderItem {
      product_id: Uuid::new_v4(),
      title: "widget".to_string(),
      image_url: None,
      unit_price_cents: 1000,
      quantity: 2,
    }
  }

  #[tokio::test]
  async fn creates_checkout_with_approval_url() {
    let gateway = SandboxGateway::new();
    let checkout = gateway.create_checkout(&request(2000, vec![one_item()])).await.unwrap();
    assert!(!checkout.approval_url.is_empty());
    assert!(checkout.payment_id.starts_with("sandbox_pay_"));
  }

  #[tokio::test]
  async fn rejects_zero_amount() {
    let gateway = SandboxGateway::new();
    let err = gateway.create_checkout(&request(0, vec![one_item()])).await.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));
  }

  #[tokio::test]
  async fn capture_echoes_payment_id_and_completes() {
    let gateway = SandboxGateway::new();
    let checkout = gateway.create_checkout(&request(2000, vec![one_item()])).await.unwrap();

    let captured = gateway.capture(&checkout.payment_id).await.unwrap();
    assert_eq!(captured.payment_id, checkout.payment_id);
    assert_eq!(captured.status, "COMPLETED");
  }
}
