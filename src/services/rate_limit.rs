use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{future::Future, net::SocketAddr, num::NonZeroU32, pin::Pin, sync::Arc};
use tower::{Layer, Service};

use crate::error::ErrorResponse;
use crate::modules::auth::bearer_token;
use crate::services::jwt::JwtService;

pub type CallerRateLimiter = Arc<DefaultKeyedRateLimiter<String>>;

/// Stale keys are swept once the store grows past this many callers
const SWEEP_THRESHOLD: usize = 10_000;

/// Per caller: `burst` requests up front, then one more per minute. A burst
/// of 0 is treated as 1.
pub fn create_rate_limiter(burst: u32) -> CallerRateLimiter {
    let quota = Quota::per_minute(NonZeroU32::MIN).allow_burst(NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::keyed(quota))
}

/// Bucket a request is charged to: the token's user, else the peer address.
fn caller_key(request: &Request<Body>, jwt: &JwtService) -> String {
    if let Some(data) = bearer_token(request.headers()).and_then(|token| jwt.verify_access_token(token).ok()) {
        return format!("user:{}", data.claims.sub);
    }

    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("ip:{}", addr.ip()),
        None => "anonymous".to_string(),
    }
}

#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: CallerRateLimiter,
    jwt: JwtService,
}

impl RateLimitLayer {
    pub fn new(limiter: CallerRateLimiter, jwt: JwtService) -> Self {
        Self { limiter, jwt }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
            jwt: self.jwt.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: CallerRateLimiter,
    jwt: JwtService,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        let key = caller_key(&request, &self.jwt);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if limiter.len() > SWEEP_THRESHOLD {
                limiter.retain_recent();
            }

            if limiter.check_key(&key).is_err() {
                tracing::warn!(path = %request.uri().path(), caller = %key, "rate limit exceeded");
                return Ok((
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorResponse::new("Too many requests, try again later")),
                )
                    .into_response());
            }
            inner.call(request).await
        })
    }
}
