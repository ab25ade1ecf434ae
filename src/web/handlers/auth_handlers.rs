// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub username: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Registration attempt for email: {}", req_payload.email);

  let user = app_state
    .auth
    .register(&req_payload.username, &req_payload.email, &req_payload.password)
    .await?;

  info!("Registration successful for email: {}. User ID: {}", user.email, user.id);
  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": "User registered successfully.",
      "user": user,
  })))
}

#[instrument(
    name = "handler::login",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Login attempt for email: {}", req_payload.email);

  let (user, token) = app_state.auth.login(&req_payload.email, &req_payload.password).await?;

  info!("Login successful for email: {}. User ID: {}", user.email, user.id);
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Logged in successfully.",
      "token": token,
      "user": user,
  })))
}

#[instrument(name = "handler::me", skip(auth_user), fields(user_id = %auth_user.user.id))]
pub async fn me_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "user": auth_user.user,
  })))
}

/// Sessions are bearer tokens held client-side; logout is an acknowledgement
/// that the client discards its copy.
#[instrument(name = "handler::logout")]
pub async fn logout_handler() -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Logged out successfully.",
  })))
}
