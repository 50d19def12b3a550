//! Per-client rate limiting over the API scope.
//!
//! A keyed token bucket per client address. Exceeding the quota answers 429
//! without touching any handler below.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use governor::{
    clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter,
};
use serde_json::json;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

type IpLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

#[derive(Debug)]
struct TooManyRequests;

impl fmt::Display for TooManyRequests {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Too many requests")
    }
}

impl ResponseError for TooManyRequests {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::TooManyRequests().json(json!({
            "error": "Too many requests"
        }))
    }
}

/// Cloning shares the underlying limiter, so one instance constructed at
/// startup gives every worker the same budget.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<IpLimiter>,
}

impl RateLimit {
    pub fn per_hour(max: u32) -> Self {
        let quota = Quota::per_hour(NonZeroU32::new(max).expect("rate limit must be non-zero"));
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

pub struct RateLimitService<S> {
    service: S,
    limiter: Arc<IpLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
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
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        if self.limiter.check_key(&key).is_err() {
            log::warn!("rate limit exceeded for {}", key);
            return Box::pin(async move { Err(TooManyRequests.into()) });
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
