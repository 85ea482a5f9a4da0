//! Per-second request cap for routes that call the AI services.
//!
//! Every chat turn, transcript and speech request may cost a paid model
//! call, so these routes share one counter that resets each second.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Extension, Request};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorBody;

#[derive(Clone)]
pub struct RateLimiter {
    max_per_sec: u64,
    origin: Instant,
    /// Window second (seconds since `origin`) in the high 32 bits, requests
    /// admitted in that window in the low 32 bits. One word so a window
    /// rollover and its first admission happen in a single CAS.
    state: Arc<AtomicU64>,
}

const COUNT_MASK: u64 = u32::MAX as u64;

impl RateLimiter {
    /// A limiter allowing `max_per_sec` requests per second. Zero disables it.
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec: max_per_sec.min(COUNT_MASK),
            origin: Instant::now(),
            state: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(self.origin.elapsed().as_secs())
    }

    fn try_acquire_at(&self, now: u64) -> bool {
        if self.max_per_sec == 0 {
            return true;
        }
        let window = now & COUNT_MASK;
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = if current >> 32 != window {
                (window << 32) | 1
            } else if current & COUNT_MASK < self.max_per_sec {
                current + 1
            } else {
                return false;
            };
            match self
                .state
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}

pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        return next.run(req).await;
    }
    tracing::warn!(path = %req.uri().path(), "Rate limit exceeded");
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, "1")],
        Json(ErrorBody {
            error: "too_many_requests".to_string(),
            message: "Rate limit exceeded".to_string(),
        }),
    )
        .into_response()
}
