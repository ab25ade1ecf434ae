// src/lib.rs

//! Storefront API: an e-commerce backend with a redirect-based PayPal
//! checkout flow and role-gated staff operations.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod web;
