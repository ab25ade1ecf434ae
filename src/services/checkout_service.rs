// src/services/checkout_service.rs

//! Checkout Orchestrator: drives the two-step redirect-based payment flow.
//!
//! Step one (`create_order`) builds a provider-side payment intent and
//! persists a pending order; no local write happens before the gateway call
//! succeeds. Step two (`capture_payment`) finalizes the order from the
//! identifiers the client echoes back after the provider redirect: it marks
//! the order paid/confirmed, decrements stock per line item, and deletes the
//! cart. The writes are sequential with no transaction or compensation, so a
//! mid-sequence failure leaves earlier writes in place.

use std::sync::Arc;

use chrono::Utc;
use sqlx::types::Json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::gateway::{CheckoutRequest, PaymentGateway};
use crate::models::order::items_total_cents;
use crate::models::{AddressInfo, Order, OrderItem, OrderStatus, PaymentStatus};
use crate::storage::{CartStore, OrderStore, ProductStore};

pub const PAYMENT_METHOD: &str = "paypal";
pub const CURRENCY: &str = "USD";

#[derive(Debug, Clone)]
pub struct CreatedOrder {
  pub order_id: Uuid,
  pub approval_url: String,
}

#[derive(Clone)]
pub struct CheckoutService {
  orders: Arc<dyn OrderStore>,
  carts: Arc<dyn CartStore>,
  products: Arc<dyn ProductStore>,
  gateway: Arc<dyn PaymentGateway>,
  client_base_url: String,
}

impl CheckoutService {
  pub fn new(
    orders: Arc<dyn OrderStore>,
    carts: Arc<dyn CartStore>,
    products: Arc<dyn ProductStore>,
    gateway: Arc<dyn PaymentGateway>,
    client_base_url: String,
  ) -> Self {
    Self {
      orders,
      carts,
      products,
      gateway,
      client_base_url,
    }
  }

  #[instrument(
    name = "checkout::create_order",
    skip(self, items, address),
    fields(user_id = %user_id, cart_id = %cart_id)
  )]
  pub async fn create_order(
    &self,
    user_id: Uuid,
    cart_id: Uuid,
    items: Vec<OrderItem>,
    address: AddressInfo,
    total_amount_cents: i64,
  ) -> Result<CreatedOrder> {
    if items.is_empty() {
      return Err(AppError::Validation("Order must contain at least one item.".to_string()));
    }
    // A negative quantity would add stock back at capture time.
    if items.iter().any(|item| item.quantity <= 0 || item.unit_price_cents < 0) {
      return Err(AppError::Validation(
        "Line items must have a positive quantity and a non-negative price.".to_string(),
      ));
    }
    if items_total_cents(&items) != total_amount_cents {
      return Err(AppError::Validation(
        "Order total does not match line item subtotals.".to_string(),
      ));
    }

    let request = CheckoutRequest {
      reference_id: Uuid::new_v4().to_string(),
      items: items.clone(),
      total_cents: total_amount_cents,
      currency: CURRENCY.to_string(),
      return_url: format!("{}/shop/paypal-return", self.client_base_url),
      cancel_url: format!("{}/shop/paypal-cancel", self.client_base_url),
    };

    // Gateway first: if this fails there is nothing local to roll back.
    let checkout = self.gateway.create_checkout(&request).await?;

    let now = Utc::now();
    let order = Order {
      id: Uuid::new_v4(),
      user_id,
      cart_id,
      items: Json(items),
      address: Json(address),
      order_status: OrderStatus::Pending,
      payment_method: PAYMENT_METHOD.to_string(),
      payment_status: PaymentStatus::Pending,
      total_amount_cents,
      currency: CURRENCY.to_string(),
      payment_id: Some(checkout.payment_id),
      payer_id: None,
      created_at: now,
      updated_at: now,
    };
    self.orders.insert_order(&order).await?;

    info!(order_id = %order.id, "Pending order created; returning approval URL.");
    Ok(CreatedOrder {
      order_id: order.id,
      approval_url: checkout.approval_url,
    })
  }

  #[instrument(
    name = "checkout::capture_payment",
    skip(self, payment_id, payer_id),
    fields(order_id = %order_id)
  )]
  pub async fn capture_payment(&self, payment_id: &str, payer_id: &str, order_id: Uuid) -> Result<Order> {
    let mut order = self
      .orders
      .find_order(order_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Order can not be found".to_string()))?;

    // Capturing twice would decrement stock twice; reject before mutating.
    if order.payment_status == PaymentStatus::Paid {
      return Err(AppError::Validation("Order has already been captured.".to_string()));
    }

    order.payment_status = PaymentStatus::Paid;
    order.order_status = OrderStatus::Confirmed;
    order.payment_id = Some(payment_id.to_string());
    order.payer_id = Some(payer_id.to_string());
    order.updated_at = Utc::now();

    for item in order.items.0.iter() {
      let product = self.products.find_product(item.product_id).await?.ok_or_else(|| {
        warn!(product_id = %item.product_id, "Ordered product vanished before capture.");
        AppError::NotFound(format!("Product {} can not be found", item.product_id))
      })?;

      // Unguarded read-modify-write: concurrent captures of the same product
      // can drive stock negative.
      self.products.decrement_stock(product.id, item.quantity).await?;
    }

    self.carts.delete_cart(order.cart_id).await?;
    self.orders.update_order(&order).await?;

    info!(order_id = %order.id, "Order confirmed and paid; cart removed.");
    Ok(order)
  }

  #[instrument(name = "checkout::orders_for_user", skip(self), fields(user_id = %user_id))]
  pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let orders = self.orders.list_orders_by_user(user_id).await?;
    if orders.is_empty() {
      return Err(AppError::NotFound("No orders found!".to_string()));
    }
    Ok(orders)
  }

  #[instrument(name = "checkout::order_details", skip(self), fields(order_id = %order_id))]
  pub async fn order_details(&self, order_id: Uuid) -> Result<Order> {
    self
      .orders
      .find_order(order_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Order not found!".to_string()))
  }
}
