// src/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::gateway::PaymentGateway;
use crate::services::{AuthService, CheckoutService};
use crate::storage::{CartStore, OrderStore, ProductStore, UserStore};

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub users: Arc<dyn UserStore>,
  pub products: Arc<dyn ProductStore>,
  pub carts: Arc<dyn CartStore>,
  pub orders: Arc<dyn OrderStore>,
  pub auth: AuthService,
  pub checkout: CheckoutService,
}

impl AppState {
  pub fn build(
    config: Arc<AppConfig>,
    users: Arc<dyn UserStore>,
    products: Arc<dyn ProductStore>,
    carts: Arc<dyn CartStore>,
    orders: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
  ) -> Self {
    let auth = AuthService::new(users.clone(), config.jwt_secret.clone(), config.jwt_ttl_minutes);
    let checkout = CheckoutService::new(
      orders.clone(),
      carts.clone(),
      products.clone(),
      gateway,
      config.client_base_url.clone(),
    );
    Self {
      config,
      users,
      products,
      carts,
      orders,
      auth,
      checkout,
    }
  }
}
