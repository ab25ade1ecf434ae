// src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use cart::{Cart, CartItem};
pub use order::{AddressInfo, Order, OrderItem, OrderStatus, PaymentStatus};
pub use product::Product;
pub use user::{Role, User};
