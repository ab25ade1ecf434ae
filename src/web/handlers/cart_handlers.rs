// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(app_state, path), fields(user_id = %path.as_ref()))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();

  let cart = app_state
    .carts
    .find_cart_by_user(user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Cart not found!".to_string()))?;
  let items = app_state.carts.cart_items(cart.id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": {
          "cart": cart,
          "items": items,
      },
  })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload),
    fields(user_id = %req_payload.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  info!(
    "Add to cart attempt by user: {}, product: {}, quantity: {}",
    payload.user_id, payload.product_id, payload.quantity
  );

  if payload.quantity <= 0 {
    return Err(AppError::Validation("Quantity must be greater than zero.".to_string()));
  }

  let product = app_state
    .products
    .find_product(payload.product_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found!".to_string()))?;

  // Reconcile the requested quantity against current stock before the line
  // lands in the cart. Stock itself only moves at capture time.
  if product.total_stock < payload.quantity {
    warn!(
      "Insufficient stock for product {}: requested {}, available {}",
      product.id, payload.quantity, product.total_stock
    );
    return Err(AppError::Validation("Insufficient stock.".to_string()));
  }

  let cart = match app_state.carts.find_cart_by_user(payload.user_id).await? {
    Some(cart) => cart,
    None => app_state.carts.create_cart(payload.user_id).await?,
  };
  let item = app_state
    .carts
    .upsert_cart_item(cart.id, payload.product_id, payload.quantity)
    .await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Item added to cart successfully.",
      "data": item,
  })))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, path))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
  let (user_id, product_id) = path.into_inner();

  let cart = app_state
    .carts
    .find_cart_by_user(user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Cart not found!".to_string()))?;

  let removed = app_state.carts.remove_cart_item(cart.id, product_id).await?;
  if !removed {
    return Err(AppError::NotFound("Cart item not found!".to_string()));
  }

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Item removed from cart.",
  })))
}
