// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Access Denied: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Payment Gateway Error: {0}")]
  Gateway(String),

  #[error("Too Many Requests: {0}")]
  RateLimited(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in code that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(db_err) => AppError::Sqlx(db_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    // The client contract is a flat envelope: {"success": false, "message": ...}
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"success": false, "message": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"success": false, "message": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"success": false, "message": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"success": false, "message": m})),
      AppError::Gateway(m) => {
        HttpResponse::BadGateway().json(json!({"success": false, "message": "Payment provider error", "detail": m}))
      }
      AppError::RateLimited(m) => HttpResponse::TooManyRequests().json(json!({"success": false, "message": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"success": false, "message": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => {
        HttpResponse::InternalServerError().json(json!({"success": false, "message": "Database operation failed"}))
      }
      AppError::Internal(_) => {
        HttpResponse::InternalServerError().json(json!({"success": false, "message": "Some error occured!"}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
