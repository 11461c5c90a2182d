//! Server-side authorization gate
//!
//! A tower layer placed in front of every tonic service. Unlike a tonic
//! `Interceptor` it sees the request path, so it can look up the method in
//! the `AccessPolicy` before the call is dispatched.
//!
//! For each request:
//! 1. Log the method path
//! 2. Methods without a policy entry are forwarded as-is
//! 3. Extract `authorization: Bearer <token>` (missing ⇒ `Unauthenticated`)
//! 4. Validate the token (invalid/expired ⇒ `Unauthenticated`)
//! 5. Check the role against the allow-list (⇒ `PermissionDenied`)
//! 6. Store `Claims` in request extensions and forward the request unchanged
//!
//! Rejected calls never reach the inner service; the gate answers with a
//! trailers-only gRPC status response.

use crate::claims::Claims;
use crate::error::AuthError;
use crate::policy::AccessPolicy;
use crate::token::TokenManager;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tower::{Layer, Service};
use tracing::{debug, info, warn};

struct Gate {
    tokens: TokenManager,
    policy: AccessPolicy,
}

impl Gate {
    /// `Ok(None)` means the method is open and no token was inspected
    fn authorize(&self, method: &str, headers: &HeaderMap) -> Result<Option<Claims>, AuthError> {
        if !self.policy.is_restricted(method) {
            return Ok(None);
        }

        let token = bearer_token(headers)?;
        let claims = self.tokens.validate(token)?;
        self.policy.authorize(method, &claims)?;

        debug!(
            method = %method,
            username = %claims.sub,
            role = %claims.role,
            "Caller authorized"
        );

        Ok(Some(claims))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

/// Tower layer enforcing bearer-token authentication and role authorization
#[derive(Clone)]
pub struct AuthorizationLayer {
    gate: Arc<Gate>,
}

impl AuthorizationLayer {
    pub fn new(tokens: TokenManager, policy: AccessPolicy) -> Self {
        info!(restricted_methods = policy.len(), "Authorization gate configured");
        Self {
            gate: Arc::new(Gate { tokens, policy }),
        }
    }
}

impl<S> Layer<S> for AuthorizationLayer {
    type Service = AuthorizationService<S>;

    fn layer(&self, service: S) -> Self::Service {
        AuthorizationService {
            inner: service,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthorizationService<S> {
    inner: S,
    gate: Arc<Gate>,
}

impl<S, B> Service<http::Request<B>> for AuthorizationService<S>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        let method = req.uri().path().to_string();
        info!(method = %method, "--> grpc call");

        match self.gate.authorize(&method, req.headers()) {
            Ok(claims) => {
                if let Some(claims) = claims {
                    req.extensions_mut().insert(claims);
                }

                // The clone is not guaranteed ready; keep the driven one for this call
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                warn!(method = %method, error = %err, "Call rejected by authorization gate");
                let response = err.to_status().into_http();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(bearer_token(&headers), Err(AuthError::MalformedHeader)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(AuthError::MalformedHeader)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
