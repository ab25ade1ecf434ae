// tests/common/mod.rs
#![allow(dead_code)] // Not every fixture is used by every test binary.

//! Shared test fixtures: an in-memory implementation of the store traits so
//! the checkout and auth flows can be exercised without Postgres, plus
//! builders for the domain records.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use storefront_api::errors::Result;
use storefront_api::gateway::SandboxGateway;
use storefront_api::models::{
  AddressInfo, Cart, CartItem, Order, OrderItem, OrderStatus, PaymentStatus, Product, Role, User,
};
use storefront_api::services::{AuthService, CheckoutService};
use storefront_api::storage::{CartStore, OrderStore, ProductStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
  users: Mutex<HashMap<Uuid, User>>,
  products: Mutex<HashMap<Uuid, Product>>,
  carts: Mutex<HashMap<Uuid, Cart>>,
  cart_items: Mutex<HashMap<Uuid, Vec<CartItem>>>,
  orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryStore {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn product_stock(&self, id: Uuid) -> Option<i32> {
    self.products.lock().get(&id).map(|p| p.total_stock)
  }

  pub fn cart_exists(&self, id: Uuid) -> bool {
    self.carts.lock().contains_key(&id)
  }

  pub fn order_count(&self) -> usize {
    self.orders.lock().len()
  }

  pub fn remove_user(&self, id: Uuid) {
    self.users.lock().remove(&id);
  }

  pub fn touch_password_changed(&self, id: Uuid, at: DateTime<Utc>) {
    if let Some(user) = self.users.lock().get_mut(&id) {
      user.password_changed_at = Some(at);
    }
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn insert_user(&self, user: &User) -> Result<()> {
    self.users.lock().insert(user.id, user.clone());
    Ok(())
  }

  async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.users.lock().get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.users.lock().values().find(|u| u.email == email).cloned())
  }

  async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
    Ok(self.users.lock().values().find(|u| u.username == username).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    Ok(self.users.lock().values().cloned().collect())
  }

  async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
    let mut users = self.users.lock();
    Ok(users.get_mut(&id).map(|user| {
      user.role = role;
      user.updated_at = Utc::now();
      user.clone()
    }))
  }

  async fn deactivate_user(&self, id: Uuid) -> Result<Option<User>> {
    let mut users = self.users.lock();
    Ok(users.get_mut(&id).map(|user| {
      user.is_active = false;
      user.updated_at = Utc::now();
      user.clone()
    }))
  }
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn insert_product(&self, product: &Product) -> Result<()> {
    self.products.lock().insert(product.id, product.clone());
    Ok(())
  }

  async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
    Ok(self.products.lock().get(&id).cloned())
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    Ok(self.products.lock().values().cloned().collect())
  }

  async fn update_product(&self, product: &Product) -> Result<Option<Product>> {
    let mut products = self.products.lock();
    if !products.contains_key(&product.id) {
      return Ok(None);
    }
    products.insert(product.id, product.clone());
    Ok(Some(product.clone()))
  }

  async fn delete_product(&self, id: Uuid) -> Result<bool> {
    Ok(self.products.lock().remove(&id).is_some())
  }

  async fn decrement_stock(&self, id: Uuid, quantity: i32) -> Result<()> {
    if let Some(product) = self.products.lock().get_mut(&id) {
      product.total_stock -= quantity;
      product.updated_at = Utc::now();
    }
    Ok(())
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn create_cart(&self, user_id: Uuid) -> Result<Cart> {
    let now = Utc::now();
    let cart = Cart {
      id: Uuid::new_v4(),
      user_id,
      created_at: now,
      updated_at: now,
    };
    self.carts.lock().insert(cart.id, cart.clone());
    Ok(cart)
  }

  async fn find_cart(&self, id: Uuid) -> Result<Option<Cart>> {
    Ok(self.carts.lock().get(&id).cloned())
  }

  async fn find_cart_by_user(&self, user_id: Uuid) -> Result<Option<Cart>> {
    Ok(self.carts.lock().values().find(|c| c.user_id == user_id).cloned())
  }

  async fn cart_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>> {
    Ok(self.cart_items.lock().get(&cart_id).cloned().unwrap_or_default())
  }

  async fn upsert_cart_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartItem> {
    let mut all_items = self.cart_items.lock();
    let items = all_items.entry(cart_id).or_default();
    if let Some(existing) = items.iter_mut().find(|i| i.product_id == product_id) {
      existing.quantity += quantity;
      return Ok(existing.clone());
    }
    let item = CartItem {
      cart_id,
      product_id,
      quantity,
    };
    items.push(item.clone());
    Ok(item)
  }

  async fn remove_cart_item(&self, cart_id: Uuid, product_id: Uuid) -> Result<bool> {
    let mut all_items = self.cart_items.lock();
    let Some(items) = all_items.get_mut(&cart_id) else {
      return Ok(false);
    };
    let before = items.len();
    items.retain(|i| i.product_id != product_id);
    Ok(items.len() < before)
  }

  async fn delete_cart(&self, id: Uuid) -> Result<()> {
    self.carts.lock().remove(&id);
    self.cart_items.lock().remove(&id);
    Ok(())
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order(&self, order: &Order) -> Result<()> {
    self.orders.lock().insert(order.id, order.clone());
    Ok(())
  }

  async fn find_order(&self, id: Uuid) -> Result<Option<Order>> {
    Ok(self.orders.lock().get(&id).cloned())
  }

  async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    Ok(self.orders.lock().values().filter(|o| o.user_id == user_id).cloned().collect())
  }

  async fn update_order(&self, order: &Order) -> Result<()> {
    self.orders.lock().insert(order.id, order.clone());
    Ok(())
  }

  async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>> {
    let mut orders = self.orders.lock();
    Ok(orders.get_mut(&id).map(|order| {
      order.order_status = status;
      order.updated_at = Utc::now();
      order.clone()
    }))
  }
}

// --- Service builders ---

pub fn checkout_service(store: &Arc<MemoryStore>) -> CheckoutService {
  CheckoutService::new(
    store.clone(),
    store.clone(),
    store.clone(),
    Arc::new(SandboxGateway::new()),
    "http://localhost:5173".to_string(),
  )
}

pub fn auth_service(store: &Arc<MemoryStore>) -> AuthService {
  AuthService::new(store.clone(), "test-signing-secret".to_string(), 60)
}

// --- Record builders ---

pub async fn seed_product(store: &Arc<MemoryStore>, title: &str, price_cents: i64, total_stock: i32) -> Product {
  let now = Utc::now();
  let product = Product {
    id: Uuid::new_v4(),
    title: title.to_string(),
    description: None,
    category: "general".to_string(),
    brand: "acme".to_string(),
    price_cents,
    sale_price_cents: None,
    total_stock,
    image_url: None,
    created_at: now,
    updated_at: now,
  };
  store.insert_product(&product).await.unwrap();
  product
}

pub fn line_item(product: &Product, quantity: i32) -> OrderItem {
  OrderItem {
    product_id: product.id,
    title: product.title.clone(),
    image_url: product.image_url.clone(),
    unit_price_cents: product.price_cents,
    quantity,
  }
}

pub fn shipping_address() -> AddressInfo {
  AddressInfo {
    address: "1 Main St".to_string(),
    city: "Springfield".to_string(),
    postal_code: "12345".to_string(),
    phone: "555-0100".to_string(),
    notes: None,
  }
}

/// Asserts the standard post-capture state of an order.
pub fn assert_captured(order: &Order, payment_id: &str, payer_id: &str) {
  assert_eq!(order.order_status, OrderStatus::Confirmed);
  assert_eq!(order.payment_status, PaymentStatus::Paid);
  assert_eq!(order.payment_id.as_deref(), Some(payment_id));
  assert_eq!(order.payer_id.as_deref(), Some(payer_id));
}
