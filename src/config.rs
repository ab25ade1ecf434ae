// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Front-end base URL; the gateway redirects the shopper back underneath it.
  pub client_base_url: String,

  // PayPal REST credentials (sandbox or live, depending on PAYPAL_API_BASE).
  pub paypal_api_base: String,
  pub paypal_client_id: String,
  pub paypal_client_secret: String,

  pub jwt_secret: String,
  pub jwt_ttl_minutes: i64,

  // Per-IP request caps over a fixed window, a general one and a stricter
  // one for the authentication endpoints.
  pub rate_limit_window_secs: u64,
  pub rate_limit_max_requests: u32,
  pub auth_rate_limit_max_requests: u32,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let client_base_url = get_env("CLIENT_BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

    let paypal_api_base = get_env("PAYPAL_API_BASE").unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".to_string());
    let paypal_client_id = get_env("PAYPAL_CLIENT_ID")?;
    let paypal_client_secret = get_env("PAYPAL_CLIENT_SECRET")?;

    let jwt_secret = get_env("JWT_SECRET")?;
    let jwt_ttl_minutes = get_env("JWT_TTL_MINUTES")
      .unwrap_or_else(|_| "60".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid JWT_TTL_MINUTES: {}", e)))?;

    let rate_limit_window_secs = get_env("RATE_LIMIT_WINDOW_SECS")
      .unwrap_or_else(|_| "900".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid RATE_LIMIT_WINDOW_SECS: {}", e)))?;
    let rate_limit_max_requests = get_env("RATE_LIMIT_MAX_REQUESTS")
      .unwrap_or_else(|_| "100".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid RATE_LIMIT_MAX_REQUESTS: {}", e)))?;
    let auth_rate_limit_max_requests = get_env("AUTH_RATE_LIMIT_MAX_REQUESTS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid AUTH_RATE_LIMIT_MAX_REQUESTS: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      client_base_url,
      paypal_api_base,
      paypal_client_id,
      paypal_client_secret,
      jwt_secret,
      jwt_ttl_minutes,
      rate_limit_window_secs,
      rate_limit_max_requests,
      auth_rate_limit_max_requests,
    })
  }
}
