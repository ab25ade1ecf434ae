// src/storage/mod.rs

//! Store traits for the persistent records (orders, carts, products, users)
//! and the Postgres implementation. The traits are object-safe so the web
//! layer can hold them behind `Arc<dyn ...>` and tests can substitute an
//! in-memory implementation.

pub mod pg;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{Cart, CartItem, Order, OrderStatus, Product, Role, User};

pub use pg::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn insert_user(&self, user: &User) -> Result<()>;
  async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
  async fn list_users(&self) -> Result<Vec<User>>;
  /// Returns the updated user, or `None` when no such user exists.
  async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>>;
  /// Soft-deactivation; the record itself is kept.
  async fn deactivate_user(&self, id: Uuid) -> Result<Option<User>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
  async fn insert_product(&self, product: &Product) -> Result<()>;
  async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;
  async fn list_products(&self) -> Result<Vec<Product>>;
  async fn update_product(&self, product: &Product) -> Result<Option<Product>>;
  async fn delete_product(&self, id: Uuid) -> Result<bool>;
  /// Decrements `total_stock` by `quantity`. No floor check: the resulting
  /// stock may go negative under concurrent captures.
  async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<()>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
  async fn create_cart(&self, user_id: Uuid) -> Result<Cart>;
  async fn find_cart(&self, id: Uuid) -> Result<Option<Cart>>;
  async fn find_cart_by_user(&self, user_id: Uuid) -> Result<Option<Cart>>;
  async fn cart_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>>;
  /// Adds `quantity` to an existing line or inserts a new one.
  async fn upsert_cart_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem>;
  async fn remove_cart_item(&self, cart_id: Uuid, product_id: Uuid) -> Result<bool>;
  /// Removes the cart and all of its line items.
  async fn delete_cart(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert_order(&self, order: &Order) -> Result<()>;
  async fn find_order(&self, id: Uuid) -> Result<Option<Order>>;
  async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
  /// Persists payment fields, statuses and `updated_at` of an existing order.
  async fn update_order(&self, order: &Order) -> Result<()>;
  /// Staff-side fulfilment status change, independent of payment state.
  async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>>;
}
