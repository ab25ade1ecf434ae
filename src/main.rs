// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

use storefront_api::config::AppConfig;
use storefront_api::gateway::PayPalGateway;
use storefront_api::state::AppState;
use storefront_api::storage::PgStore;
use storefront_api::web::rate_limit::RateLimiter;
use storefront_api::web::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront API server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize Database Pool
  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  let store = Arc::new(PgStore::new(db_pool));
  let gateway = Arc::new(PayPalGateway::new(
    app_config.paypal_api_base.clone(),
    app_config.paypal_client_id.clone(),
    app_config.paypal_client_secret.clone(),
  ));

  let app_state = AppState::build(
    app_config.clone(),
    store.clone(),
    store.clone(),
    store.clone(),
    store,
    gateway,
  );

  // Rate limiters shared across all worker threads
  let window = Duration::from_secs(app_config.rate_limit_window_secs);
  let general_limiter = RateLimiter::general(app_config.rate_limit_max_requests, window);
  let auth_limiter = RateLimiter::auth(app_config.auth_rate_limit_max_requests, window);

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .wrap(general_limiter.clone())
      .configure(|cfg| routes::configure_app_routes(cfg, auth_limiter.clone()))
      .default_service(actix_data::route().to(routes::not_found_handler))
  })
  .bind(&server_address)?
  .run()
  .await
}
