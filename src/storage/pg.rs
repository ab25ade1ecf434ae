// src/storage/pg.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{Cart, CartItem, Order, OrderStatus, Product, Role, User};
use crate::storage::{CartStore, OrderStore, ProductStore, UserStore};

/// Postgres-backed implementation of every store trait. All queries are
/// runtime `query_as` strings against the shared pool; there is no
/// cross-statement transaction anywhere (see the capture flow notes in the
/// checkout service).
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, role, is_active, password_changed_at, created_at, updated_at";

#[async_trait]
impl UserStore for PgStore {
  async fn insert_user(&self, user: &User) -> Result<()> {
    sqlx::query(
      "INSERT INTO users (id, username, email, password_hash, role, is_active, password_changed_at, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.is_active)
    .bind(user.password_changed_at)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS))
      .bind(username)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let users = sqlx::query_as(&format!("SELECT {} FROM users ORDER BY created_at ASC", USER_COLUMNS))
      .fetch_all(&self.pool)
      .await?;
    Ok(users)
  }

  async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
    let user = sqlx::query_as(&format!(
      "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING {}",
      USER_COLUMNS
    ))
    .bind(id)
    .bind(role)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  async fn deactivate_user(&self, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as(&format!(
      "UPDATE users SET is_active = FALSE, updated_at = now() WHERE id = $1 RETURNING {}",
      USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }
}

const PRODUCT_COLUMNS: &str =
  "id, title, description, category, brand, price_cents, sale_price_cents, total_stock, image_url, created_at, updated_at";

#[async_trait]
impl ProductStore for PgStore {
  async fn insert_product(&self, product: &Product) -> Result<()> {
    sqlx::query(
      "INSERT INTO products (id, title, description, category, brand, price_cents, sale_price_cents, total_stock, image_url, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(product.id)
    .bind(&product.title)
    .bind(&product.description)
    .bind(&product.category)
    .bind(&product.brand)
    .bind(product.price_cents)
    .bind(product.sale_price_cents)
    .bind(product.total_stock)
    .bind(&product.image_url)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as(&format!("SELECT {} FROM products ORDER BY title ASC", PRODUCT_COLUMNS))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  async fn update_product(&self, product: &Product) -> Result<Option<Product>> {
    let updated = sqlx::query_as(&format!(
      "UPDATE products SET title = $2, description = $3, category = $4, brand = $5, price_cents = $6, \
       sale_price_cents = $7, total_stock = $8, image_url = $9, updated_at = now() WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(product.id)
    .bind(&product.title)
    .bind(&product.description)
    .bind(&product.category)
    .bind(&product.brand)
    .bind(product.price_cents)
    .bind(product.sale_price_cents)
    .bind(product.total_stock)
    .bind(&product.image_url)
    .fetch_optional(&self.pool)
    .await?;
    Ok(updated)
  }

  async fn delete_product(&self, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<()> {
    sqlx::query("UPDATE products SET total_stock = total_stock - $2, updated_at = now() WHERE id = $1")
      .bind(id)
      .bind(quantity)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}

#[async_trait]
impl CartStore for PgStore {
  async fn create_cart(&self, user_id: Uuid) -> Result<Cart> {
    let cart = sqlx::query_as(
      "INSERT INTO carts (id, user_id, created_at, updated_at) VALUES ($1, $2, now(), now()) \
       RETURNING id, user_id, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(cart)
  }

  async fn find_cart(&self, id: Uuid) -> Result<Option<Cart>> {
    let cart = sqlx::query_as("SELECT id, user_id, created_at, updated_at FROM carts WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn find_cart_by_user(&self, user_id: Uuid) -> Result<Option<Cart>> {
    let cart = sqlx::query_as("SELECT id, user_id, created_at, updated_at FROM carts WHERE user_id = $1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(cart)
  }

  async fn cart_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>> {
    let items = sqlx::query_as("SELECT cart_id, product_id, quantity FROM cart_items WHERE cart_id = $1")
      .bind(cart_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(items)
  }

  async fn upsert_cart_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
    let item = sqlx::query_as(
      "INSERT INTO cart_items (cart_id, product_id, quantity) VALUES ($1, $2, $3) \
       ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity \
       RETURNING cart_id, product_id, quantity",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(&self.pool)
    .await?;
    Ok(item)
  }

  async fn remove_cart_item(&self, cart_id: Uuid, product_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
      .bind(cart_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn delete_cart(&self, id: Uuid) -> Result<()> {
    // cart_items rows are removed by the ON DELETE CASCADE on the FK
    sqlx::query("DELETE FROM carts WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}

const ORDER_COLUMNS: &str = "id, user_id, cart_id, items, address, order_status, payment_method, payment_status, \
   total_amount_cents, currency, payment_id, payer_id, created_at, updated_at";

#[async_trait]
impl OrderStore for PgStore {
  async fn insert_order(&self, order: &Order) -> Result<()> {
    sqlx::query(
      "INSERT INTO orders (id, user_id, cart_id, items, address, order_status, payment_method, payment_status, \
       total_amount_cents, currency, payment_id, payer_id, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.cart_id)
    .bind(&order.items)
    .bind(&order.address)
    .bind(order.order_status)
    .bind(&order.payment_method)
    .bind(order.payment_status)
    .bind(order.total_amount_cents)
    .bind(&order.currency)
    .bind(&order.payment_id)
    .bind(&order.payer_id)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn find_order(&self, id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(order)
  }

  async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let orders = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
      ORDER_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }

  async fn update_order(&self, order: &Order) -> Result<()> {
    sqlx::query(
      "UPDATE orders SET order_status = $2, payment_status = $3, payment_id = $4, payer_id = $5, updated_at = $6 \
       WHERE id = $1",
    )
    .bind(order.id)
    .bind(order.order_status)
    .bind(order.payment_status)
    .bind(&order.payment_id)
    .bind(&order.payer_id)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>> {
    let order = sqlx::query_as(&format!(
      "UPDATE orders SET order_status = $2, updated_at = now() WHERE id = $1 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(&self.pool)
    .await?;
    Ok(order)
  }
}
