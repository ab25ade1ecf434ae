// src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::web::handlers::{admin_handlers, auth_handlers, cart_handlers, order_handlers, product_handlers};
use crate::web::rate_limit::RateLimiter;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "success": true, "message": "Server is running" }))
}

pub async fn not_found_handler() -> HttpResponse {
  HttpResponse::NotFound().json(serde_json::json!({ "success": false, "message": "Route not found" }))
}

/// Configures the full API surface. The general per-IP limiter is mounted on
/// the whole `App` in `main`; the stricter authentication limiter passed in
/// here guards only the credential endpoints. `/me` and `/logout` stay outside
/// it so session polling is not starved by the small credential quota.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, auth_limiter: RateLimiter) {
  cfg.service(
    web::scope("/api")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes (credential endpoints share a stricter limit)
      .service(
        web::scope("/auth")
          .service(
            web::resource("/register")
              .wrap(auth_limiter.clone())
              .route(web::post().to(auth_handlers::register_handler)),
          )
          .service(
            web::resource("/login")
              .wrap(auth_limiter)
              .route(web::post().to(auth_handlers::login_handler)),
          )
          .route("/me", web::get().to(auth_handlers::me_handler))
          .route("/logout", web::post().to(auth_handlers::logout_handler)),
      )
      // Storefront Routes
      .service(
        web::scope("/shop")
          .route("/order", web::post().to(order_handlers::create_order_handler))
          .route("/order/capture", web::post().to(order_handlers::capture_payment_handler))
          .route("/order/list/{user_id}", web::get().to(order_handlers::list_orders_handler))
          .route("/order/details/{id}", web::get().to(order_handlers::order_details_handler))
          .route("/products", web::get().to(product_handlers::list_products_handler))
          .route("/products/{product_id}", web::get().to(product_handlers::get_product_handler))
          .route("/cart/add", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/cart/{user_id}", web::get().to(cart_handlers::get_cart_handler))
          .route(
            "/cart/{user_id}/{product_id}",
            web::delete().to(cart_handlers::remove_cart_item_handler),
          ),
      )
      // Staff Routes (role-gated per handler)
      .service(
        web::scope("/protected")
          .route("/users", web::get().to(admin_handlers::list_users_handler))
          .route("/users/{id}", web::get().to(admin_handlers::get_user_handler))
          .route("/users/{id}/role", web::patch().to(admin_handlers::update_user_role_handler))
          .route("/users/{id}", web::delete().to(admin_handlers::deactivate_user_handler))
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route("/products/{id}", web::put().to(admin_handlers::update_product_handler))
          .route("/products/{id}", web::delete().to(admin_handlers::delete_product_handler))
          .route(
            "/orders/{id}/status",
            web::patch().to(admin_handlers::update_order_status_handler),
          ),
      ),
  );
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use actix_web::dev::ServiceResponse;
  use actix_web::http::StatusCode;
  use actix_web::{test, App, Error};

  use super::*;

  fn status_of(result: Result<ServiceResponse, Error>) -> StatusCode {
    match result {
      Ok(resp) => resp.status(),
      Err(err) => err.error_response().status(),
    }
  }

  #[actix_web::test]
  async fn credential_limiter_does_not_starve_session_endpoints() {
    let app = test::init_service(
      App::new().configure(|cfg| configure_app_routes(cfg, RateLimiter::auth(1, Duration::from_secs(60)))),
    )
    .await;

    // Session polling is outside the credential quota.
    for _ in 0..3 {
      let resp = test::call_service(&app, test::TestRequest::post().uri("/api/auth/logout").to_request()).await;
      assert_eq!(resp.status(), StatusCode::OK);
    }

    // Register and login share one strict window; with a quota of one the
    // second credential request is rejected no matter which endpoint it hits.
    let first =
      test::try_call_service(&app, test::TestRequest::post().uri("/api/auth/register").to_request()).await;
    assert_ne!(status_of(first), StatusCode::TOO_MANY_REQUESTS);

    let second = test::try_call_service(&app, test::TestRequest::post().uri("/api/auth/login").to_request()).await;
    assert_eq!(status_of(second), StatusCode::TOO_MANY_REQUESTS);
  }
}
