// src/web/handlers/admin_handlers.rs

//! Role-gated staff operations: user administration, product management, and
//! order fulfilment status. Every handler authorizes the caller's role
//! against its allowed set before touching any record.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{OrderStatus, Product, Role};
use crate::services::authorize;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct UpdateRoleRequestPayload {
  pub role: Role,
}

#[derive(Deserialize, Debug)]
pub struct ProductRequestPayload {
  pub title: String,
  pub description: Option<String>,
  pub category: String,
  pub brand: String,
  pub price_cents: i64,
  pub sale_price_cents: Option<i64>,
  pub total_stock: i32,
  pub image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusRequestPayload {
  pub status: OrderStatus,
}

// --- User administration ---

#[instrument(name = "handler::list_users", skip(app_state, auth_user), fields(caller = %auth_user.user.id))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let users = app_state.users.list_users().await?;
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": users,
  })))
}

#[instrument(name = "handler::get_user", skip(app_state, auth_user, path), fields(caller = %auth_user.user.id))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Moderator, Role::Admin])?;

  let user_id = path.into_inner();
  let user = app_state
    .users
    .find_user(user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": user,
  })))
}

#[instrument(
    name = "handler::update_user_role",
    skip(app_state, auth_user, path, req_payload),
    fields(caller = %auth_user.user.id)
)]
pub async fn update_user_role_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateRoleRequestPayload>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let user_id = path.into_inner();
  let updated = app_state
    .users
    .set_user_role(user_id, req_payload.role)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

  info!("User {} role changed to {:?}.", user_id, req_payload.role);
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "User role updated successfully.",
      "data": updated,
  })))
}

#[instrument(name = "handler::deactivate_user", skip(app_state, auth_user, path), fields(caller = %auth_user.user.id))]
pub async fn deactivate_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let user_id = path.into_inner();
  let updated = app_state
    .users
    .deactivate_user(user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;

  info!("User {} deactivated.", user_id);
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "User deactivated successfully.",
      "data": updated,
  })))
}

// --- Product management ---

#[instrument(name = "handler::create_product", skip(app_state, auth_user, req_payload), fields(caller = %auth_user.user.id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ProductRequestPayload>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let payload = req_payload.into_inner();
  let now = Utc::now();
  let product = Product {
    id: Uuid::new_v4(),
    title: payload.title,
    description: payload.description,
    category: payload.category,
    brand: payload.brand,
    price_cents: payload.price_cents,
    sale_price_cents: payload.sale_price_cents,
    total_stock: payload.total_stock,
    image_url: payload.image_url,
    created_at: now,
    updated_at: now,
  };
  app_state.products.insert_product(&product).await?;

  info!("Product {} created.", product.id);
  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "message": "Product created successfully.",
      "data": product,
  })))
}

#[instrument(
    name = "handler::update_product",
    skip(app_state, auth_user, path, req_payload),
    fields(caller = %auth_user.user.id, product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductRequestPayload>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let product_id = path.into_inner();
  let payload = req_payload.into_inner();
  let now = Utc::now();
  let product = Product {
    id: product_id,
    title: payload.title,
    description: payload.description,
    category: payload.category,
    brand: payload.brand,
    price_cents: payload.price_cents,
    sale_price_cents: payload.sale_price_cents,
    total_stock: payload.total_stock,
    image_url: payload.image_url,
    created_at: now, // ignored by the UPDATE; created_at is immutable in the store
    updated_at: now,
  };

  let updated = app_state
    .products
    .update_product(&product)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found!".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Product updated successfully.",
      "data": updated,
  })))
}

#[instrument(name = "handler::delete_product", skip(app_state, auth_user, path), fields(caller = %auth_user.user.id))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let product_id = path.into_inner();
  let deleted = app_state.products.delete_product(product_id).await?;
  if !deleted {
    return Err(AppError::NotFound("Product not found!".to_string()));
  }

  info!("Product {} deleted.", product_id);
  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Product deleted successfully.",
  })))
}

// --- Order fulfilment ---

#[instrument(
    name = "handler::update_order_status",
    skip(app_state, auth_user, path, req_payload),
    fields(caller = %auth_user.user.id, order_id = %path.as_ref())
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateOrderStatusRequestPayload>,
) -> Result<HttpResponse, AppError> {
  authorize(auth_user.user.role, &[Role::Admin])?;

  let order_id = path.into_inner();
  let updated = app_state
    .orders
    .set_order_status(order_id, req_payload.status)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found!".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Order status updated successfully.",
      "data": updated,
  })))
}
