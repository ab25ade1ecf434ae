// src/web/extractors.rs

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extractor for the authenticated caller. Pulls the bearer token, verifies
/// signature and expiry, and re-loads the user so that deleted, deactivated,
/// or password-rotated accounts are rejected before any handler runs.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user: User,
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
  let header_value = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
  let header_str = header_value.to_str().ok()?;
  header_str.strip_prefix("Bearer ").map(|token| token.trim().to_string())
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let app_state = req.app_data::<web::Data<AppState>>().cloned();
    let token = bearer_token(req);

    Box::pin(async move {
      let app_state =
        app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let token = token.ok_or_else(|| AppError::Auth("Access denied. No token provided.".to_string()))?;
      let user = app_state.auth.authenticate(&token).await?;
      Ok(AuthenticatedUser { user })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn extracts_bearer_token() {
    let req = TestRequest::default()
      .insert_header(("Authorization", "Bearer abc.def.ghi"))
      .to_http_request();
    assert_eq!(bearer_token(&req), Some("abc.def.ghi".to_string()));
  }

  #[test]
  fn rejects_non_bearer_schemes_and_missing_header() {
    let basic = TestRequest::default()
      .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
      .to_http_request();
    assert_eq!(bearer_token(&basic), None);

    let missing = TestRequest::default().to_http_request();
    assert_eq!(bearer_token(&missing), None);
  }
}
