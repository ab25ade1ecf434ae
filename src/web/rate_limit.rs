// src/web/rate_limit.rs

//! Per-IP fixed-window request limiting. Two instances are mounted in the
//! route tree: a general cap over the whole API and a stricter one wrapped
//! around the authentication endpoints.

use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use parking_lot::Mutex;
use tracing::warn;

use crate::errors::AppError;

struct WindowEntry {
  count: u32,
  window_start: Instant,
}

/// Shared window bookkeeping. Cloning shares the underlying counters, so one
/// limiter can be handed to every worker thread of the HTTP server.
#[derive(Clone)]
pub struct RateLimiter {
  max_requests: u32,
  window: Duration,
  message: &'static str,
  hits: Arc<Mutex<HashMap<String, WindowEntry>>>,
}

// Stale entries are swept once the map grows past this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

impl RateLimiter {
  pub fn new(max_requests: u32, window: Duration, message: &'static str) -> Self {
    Self {
      max_requests,
      window,
      message,
      hits: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  pub fn general(max_requests: u32, window: Duration) -> Self {
    Self::new(
      max_requests,
      window,
      "Too many requests from this IP, please try again later.",
    )
  }

  pub fn auth(max_requests: u32, window: Duration) -> Self {
    Self::new(
      max_requests,
      window,
      "Too many authentication attempts, please try again later.",
    )
  }

  /// Counts a hit against `key` and reports whether it is still within quota.
  fn allow(&self, key: &str) -> bool {
    let now = Instant::now();
    let mut hits = self.hits.lock();

    if hits.len() > SWEEP_THRESHOLD {
      let window = self.window;
      hits.retain(|_, entry| now.duration_since(entry.window_start) < window);
    }

    let entry = hits.entry(key.to_string()).or_insert(WindowEntry {
      count: 0,
      window_start: now,
    });
    if now.duration_since(entry.window_start) >= self.window {
      entry.count = 0;
      entry.window_start = now;
    }
    entry.count += 1;
    entry.count <= self.max_requests
  }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RateLimiterMiddleware<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RateLimiterMiddleware {
      service,
      limiter: self.clone(),
    }))
  }
}

pub struct RateLimiterMiddleware<S> {
  service: S,
  limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let peer = {
      let connection_info = req.connection_info();
      connection_info.realip_remote_addr().unwrap_or("unknown").to_string()
    };

    if !self.limiter.allow(&peer) {
      warn!(peer = %peer, "Request rejected by rate limiter.");
      let message = self.limiter.message;
      return Box::pin(ready(Err(AppError::RateLimited(message.to_string()).into())));
    }

    let fut = self.service.call(req);
    Box::pin(fut)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn enforces_quota_within_window() {
    let limiter = RateLimiter::general(2, Duration::from_secs(60));
    assert!(limiter.allow("10.0.0.1"));
    assert!(limiter.allow("10.0.0.1"));
    assert!(!limiter.allow("10.0.0.1"));
  }

  #[test]
  fn counts_clients_independently() {
    let limiter = RateLimiter::general(1, Duration::from_secs(60));
    assert!(limiter.allow("10.0.0.1"));
    assert!(limiter.allow("10.0.0.2"));
    assert!(!limiter.allow("10.0.0.1"));
  }

  #[test]
  fn window_expiry_resets_the_count() {
    let limiter = RateLimiter::general(1, Duration::from_millis(20));
    assert!(limiter.allow("10.0.0.1"));
    assert!(!limiter.allow("10.0.0.1"));
    std::thread::sleep(Duration::from_millis(30));
    assert!(limiter.allow("10.0.0.1"));
  }
}
