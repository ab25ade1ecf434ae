// src/services/auth_service.rs

//! Provides authentication-related services: password hashing and
//! verification, JWT issuance/validation, and the pure role check used by
//! the protected routes.

use std::sync::Arc;

use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,   // The main trait for hashing
    PasswordVerifier, // The main trait for verifying
    SaltString,
  },
  Argon2, // The Argon2 algorithm instance
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Role, User};
use crate::storage::UserStore;

/// Hashes a plain-text password using Argon2.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  debug!("Attempting to hash password.");
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default();

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => Ok(password_hash_obj.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash. Returns
/// `Ok(false)` on a mismatch; an invalid stored hash is an internal error,
/// not an authentication failure.
#[instrument(name = "auth_service::verify_password", skip(hashed_password_str, provided_password))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool> {
  let parsed_hash = match PasswordHash::new(hashed_password_str) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!(
        "Invalid stored password hash format: {}",
        parse_err
      )));
    }
  };

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// JWT session claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub role: Role,
  pub iat: i64,
  pub exp: i64,
}

pub fn issue_token(secret: &str, user: &User, ttl: Duration) -> Result<String> {
  let now = Utc::now();
  let claims = Claims {
    sub: user.id,
    role: user.role,
    iat: now.timestamp(),
    exp: (now + ttl).timestamp(),
  };
  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims> {
  let mut validation = Validation::default();
  validation.leeway = 0;
  match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
    Ok(data) => Ok(data.claims),
    Err(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) => {
      Err(AppError::Auth("Token expired.".to_string()))
    }
    Err(_) => Err(AppError::Auth("Invalid token.".to_string())),
  }
}

/// A token issued before the user's last password change no longer identifies
/// a live session.
pub fn issued_before_password_change(password_changed_at: Option<DateTime<Utc>>, token_iat: i64) -> bool {
  match password_changed_at {
    Some(changed_at) => changed_at.timestamp() > token_iat,
    None => false,
  }
}

/// Compares a caller's role against a route's declared allowed-role set.
pub fn authorize(role: Role, allowed: &[Role]) -> Result<()> {
  if allowed.contains(&role) {
    Ok(())
  } else {
    Err(AppError::Forbidden(
      "You do not have permission to perform this action.".to_string(),
    ))
  }
}

#[derive(Clone)]
pub struct AuthService {
  users: Arc<dyn UserStore>,
  jwt_secret: String,
  token_ttl: Duration,
}

impl AuthService {
  pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, ttl_minutes: i64) -> Self {
    Self {
      users,
      jwt_secret,
      token_ttl: Duration::minutes(ttl_minutes),
    }
  }

  #[instrument(name = "auth_service::register", skip(self, password), fields(email = %email))]
  pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
    if username.trim().is_empty() || email.trim().is_empty() {
      return Err(AppError::Validation("Username and email are required.".to_string()));
    }
    if self.users.find_user_by_email(email).await?.is_some() {
      return Err(AppError::Validation("Email already in use.".to_string()));
    }
    if self.users.find_user_by_username(username).await?.is_some() {
      return Err(AppError::Validation("Username already in use.".to_string()));
    }

    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      username: username.to_string(),
      email: email.to_string(),
      password_hash: hash_password(password)?,
      role: Role::User,
      is_active: true,
      password_changed_at: None,
      created_at: now,
      updated_at: now,
    };
    self.users.insert_user(&user).await?;
    Ok(user)
  }

  #[instrument(name = "auth_service::login", skip(self, password), fields(email = %email))]
  pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
    let user = self
      .users
      .find_user_by_email(email)
      .await?
      .ok_or_else(|| AppError::Auth("Invalid email or password.".to_string()))?;

    if !user.is_active {
      return Err(AppError::Auth("Account is deactivated.".to_string()));
    }
    if !verify_password(&user.password_hash, password)? {
      return Err(AppError::Auth("Invalid email or password.".to_string()));
    }

    let token = issue_token(&self.jwt_secret, &user, self.token_ttl)?;
    Ok((user, token))
  }

  /// Per-request gate: verifies the bearer token, re-loads the user, and
  /// rejects sessions whose backing account disappeared, was deactivated,
  /// or changed its password after the token was issued.
  #[instrument(name = "auth_service::authenticate", skip(self, token))]
  pub async fn authenticate(&self, token: &str) -> Result<User> {
    let claims = decode_token(&self.jwt_secret, token)?;

    let user = self
      .users
      .find_user(claims.sub)
      .await?
      .ok_or_else(|| AppError::Auth("User no longer exists.".to_string()))?;

    if !user.is_active {
      return Err(AppError::Auth("Account is deactivated.".to_string()));
    }
    if issued_before_password_change(user.password_changed_at, claims.iat) {
      return Err(AppError::Auth("Password recently changed. Please log in again.".to_string()));
    }
    Ok(user)
  }
}
