// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AddressInfo, OrderItem};
use crate::state::AppState;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct CreateOrderRequestPayload {
  pub user_id: Uuid,
  pub cart_id: Uuid,
  pub cart_items: Vec<OrderItem>,
  pub address_info: AddressInfo,
  pub total_amount_cents: i64,
}

#[derive(Deserialize, Debug)]
pub struct CapturePaymentRequestPayload {
  pub payment_id: String,
  pub payer_id: String,
  pub order_id: Uuid,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::create_order",
    skip(app_state, req_payload),
    fields(user_id = %req_payload.user_id, cart_id = %req_payload.cart_id)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateOrderRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  info!(
    "Order creation attempt by user: {}, {} line item(s)",
    payload.user_id,
    payload.cart_items.len()
  );

  let created = app_state
    .checkout
    .create_order(
      payload.user_id,
      payload.cart_id,
      payload.cart_items,
      payload.address_info,
      payload.total_amount_cents,
    )
    .await?;

  Ok(HttpResponse::Created().json(json!({
      "success": true,
      "approvalURL": created.approval_url,
      "orderId": created.order_id,
  })))
}

#[instrument(
    name = "handler::capture_payment",
    skip(app_state, req_payload),
    fields(order_id = %req_payload.order_id)
)]
pub async fn capture_payment_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CapturePaymentRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  info!("Payment capture attempt for order: {}", payload.order_id);

  let order = app_state
    .checkout
    .capture_payment(&payload.payment_id, &payload.payer_id, payload.order_id)
    .await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "message": "Order confirmed",
      "data": order,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, path), fields(user_id = %path.as_ref()))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let orders = app_state.checkout.orders_for_user(user_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": orders,
  })))
}

#[instrument(name = "handler::order_details", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn order_details_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.checkout.order_details(order_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "success": true,
      "data": order,
  })))
}
