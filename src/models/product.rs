// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub title: String,
  pub description: Option<String>,
  pub category: String,
  pub brand: String,
  pub price_cents: i64,
  pub sale_price_cents: Option<i64>,
  // Expected to stay >= 0, but the decrement at capture time performs no
  // floor check (per-document atomicity is all the store provides).
  pub total_stock: i32,
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
