// src/web/mod.rs

//! Web layer: routing, request extractors, rate limiting, and handlers.

pub mod extractors;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
