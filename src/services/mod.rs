// src/services/mod.rs

//! Application services sitting between the HTTP handlers and the stores.

pub mod auth_service;
pub mod checkout_service;

pub use auth_service::{authorize, AuthService, Claims};
pub use checkout_service::{CheckoutService, CreatedOrder};
