//! Rate limiting and request logging middleware.
//!
//! Attendee routes carry a CPF in the path. Everything logged here goes through
//! [`redact_path`] first, so only the last two digits of a CPF reach the logs.

use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use cerimonia_core::cpf;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{borrow::Cow, num::NonZeroU32, sync::Arc, time::Instant};
use tracing::{debug, warn, Span};

/// Global rate limiter (not keyed by client).
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

const FALLBACK_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(120) {
    Some(n) => n,
    None => unreachable!(),
};

/// Attendee routes; the segment after this prefix is a CPF.
const ATTENDEES_ROUTE: &str = "/v1/attendees";

/// Number of trailing CPF digits left visible in logs.
const VISIBLE_DIGITS: usize = 2;

#[derive(Clone)]
pub struct RateLimitState {
    pub global: Arc<GlobalLimiter>,
}

impl RateLimitState {
    /// A zero limit falls back to the default of 120 requests per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        let quota =
            Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(FALLBACK_PER_MINUTE));

        Self {
            global: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create a permissive rate limiter for testing.
    pub fn permissive() -> Self {
        Self::new(10_000)
    }
}

/// Mask the CPF segment of an attendee path.
///
/// `/v1/attendees/111.444.777-35/exists` becomes `/v1/attendees/***35/exists`. Other
/// paths are returned unchanged.
pub fn redact_path(path: &str) -> Cow<'_, str> {
    let Some(rest) = path
        .strip_prefix(ATTENDEES_ROUTE)
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return Cow::Borrowed(path);
    };

    let (segment, tail) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    if segment.is_empty() {
        return Cow::Borrowed(path);
    }

    let digits = cpf::normalize(segment);
    let visible = &digits[digits.len().saturating_sub(VISIBLE_DIGITS)..];
    Cow::Owned(format!("{}/***{}{}", ATTENDEES_ROUTE, visible, tail))
}

/// Span for `TraceLayer`, recording the redacted path instead of the full URI.
pub fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %redact_path(request.uri().path()),
    )
}

pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if rate_limit.global.check().is_err() {
        warn!(path = %redact_path(request.uri().path()), "Global rate limit exceeded");
        return Err(ApiError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = redact_path(request.uri().path()).into_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    // 4xx on attendee routes is normal flow (invalid form, CPF already registered)
    if status.is_success() || (status.is_client_error() && path.starts_with(ATTENDEES_ROUTE)) {
        debug!(%method, %path, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %path, %status, ?duration, "Request failed");
    }

    response
}
