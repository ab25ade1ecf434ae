// src/gateway/mod.rs

//! Payment Gateway Adapter: wraps the external provider's "create order" and
//! "capture" operations behind an object-safe trait so the checkout
//! orchestrator (and the tests) never talk to the provider directly.

pub mod paypal;
pub mod sandbox;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::OrderItem;

pub use paypal::PayPalGateway;
pub use sandbox::SandboxGateway;

/// Provider-side checkout creation request. Amounts are integer cents; the
/// adapter renders them in the provider's decimal-string format.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
  /// Idempotency/reference token for the purchase unit.
  pub reference_id: String,
  pub items: Vec<OrderItem>,
  pub total_cents: i64,
  pub currency: String,
  pub return_url: String,
  pub cancel_url: String,
}

#[derive(Debug, Clone)]
pub struct GatewayCheckout {
  /// Provider-assigned payment id, persisted onto the pending order.
  pub payment_id: String,
  /// Provider-hosted URL where the shopper authorizes payment.
  pub approval_url: String,
}

#[derive(Debug, Clone)]
pub struct GatewayCapture {
  pub payment_id: String,
  pub status: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_checkout(&self, request: &CheckoutRequest) -> Result<GatewayCheckout>;

  /// Finalizes a previously approved payment on the provider side. Exposed by
  /// the adapter for completeness; the redirect-based capture flow finalizes
  /// from the identifiers echoed back by the client and does not call this.
  async fn capture(&self, payment_id: &str) -> Result<GatewayCapture>;
}

/// Renders integer cents in the provider's `"20.00"` decimal format.
pub fn format_usd(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
