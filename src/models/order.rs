// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Staff-facing fulfilment status. Advanced independently of the payment
/// state by admin action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  InProcess,
  InShipping,
  Delivered,
  Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Paid,
}

/// One product/quantity/price entry, snapshotted onto the order at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub product_id: Uuid,
  pub title: String,
  pub image_url: Option<String>,
  pub unit_price_cents: i64,
  pub quantity: i32,
}

impl OrderItem {
  pub fn subtotal_cents(&self) -> i64 {
    self.unit_price_cents * i64::from(self.quantity)
  }
}

/// Shipping address captured verbatim at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
  pub address: String,
  pub city: String,
  pub postal_code: String,
  pub phone: String,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub cart_id: Uuid,
  // Line items and the address snapshot live on the order row as JSONB,
  // mirroring the embedded documents of the original data model.
  pub items: Json<Vec<OrderItem>>,
  pub address: Json<AddressInfo>,
  pub order_status: OrderStatus,
  pub payment_method: String,
  pub payment_status: PaymentStatus,
  pub total_amount_cents: i64,
  pub currency: String,
  pub payment_id: Option<String>,
  pub payer_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Sum of line-item subtotals; the order total must equal this at creation
/// time and is never re-validated afterwards.
pub fn items_total_cents(items: &[OrderItem]) -> i64 {
  items.iter().map(OrderItem::subtotal_cents).sum()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(price: i64, qty: i32) -> OrderItem {
    OrderItem {
      product_id: Uuid::new_v4(),
      title: "widget".to_string(),
      image_url: None,
      unit_price_cents: price,
      quantity: qty,
    }
  }

  #[test]
  fn total_is_sum_of_subtotals() {
    let items = vec![item(1000, 2), item(250, 3)];
    assert_eq!(items_total_cents(&items), 2750);
  }

  #[test]
  fn empty_item_list_totals_zero() {
    assert_eq!(items_total_cents(&[]), 0);
  }
}
