//! Integration Tests for the authorization gate
//!
//! These tests push HTTP/2-shaped requests through `AuthorizationLayer` in
//! front of a mock inner service and verify:
//! Client -> bearer injection -> gate -> token validation -> role check -> handler

use grpc_jwt_auth::{
    AccessPolicy, AuthorizationLayer, BearerInterceptor, Claims, Role, TokenManager,
    DEFAULT_TOKEN_TTL,
};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tonic::body::BoxBody;
use tonic::service::Interceptor;
use tonic::Code;
use tower::{service_fn, Layer, Service, ServiceExt};

const CREATE: &str = "/techschool.pcbook.LaptopService/CreateLaptop";
const RATE: &str = "/techschool.pcbook.LaptopService/RateLaptop";
const SEARCH: &str = "/techschool.pcbook.LaptopService/SearchLaptop";

fn tokens() -> TokenManager {
    TokenManager::new(b"integration-secret", DEFAULT_TOKEN_TTL)
}

fn policy() -> AccessPolicy {
    AccessPolicy::new()
        .allow(CREATE, [Role::Admin])
        .allow(RATE, [Role::Admin, Role::User])
}

/// Build a gated mock service and return it with its invocation counter
fn gated_service() -> (
    impl Service<http::Request<()>, Response = http::Response<BoxBody>, Error = Infallible>,
    Arc<AtomicUsize>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let inner = service_fn(move |req: http::Request<()>| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut response = http::Response::new(tonic::body::empty_body());
            if let Some(claims) = req.extensions().get::<Claims>() {
                response
                    .headers_mut()
                    .insert("x-caller", claims.sub.parse().unwrap());
            }
            Ok::<_, Infallible>(response)
        }
    });

    let layer = AuthorizationLayer::new(tokens(), policy());
    (layer.layer(inner), calls)
}

/// Simulate a client request: attach the token with the client interceptor,
/// then move the metadata onto an HTTP request for `path`
fn request(path: &str, token: Option<&str>) -> http::Request<()> {
    let mut grpc_request = tonic::Request::new(());
    if let Some(token) = token {
        let mut interceptor = BearerInterceptor::new(token).unwrap();
        grpc_request = interceptor.call(grpc_request).unwrap();
    }

    let mut builder = http::Request::builder().uri(format!("http://localhost{}", path));
    for (key, value) in grpc_request.metadata().clone().into_headers().iter() {
        builder = builder.header(key, value);
    }
    builder.body(()).unwrap()
}

fn status_of(response: &http::Response<BoxBody>) -> Option<tonic::Status> {
    tonic::Status::from_header_map(response.headers())
}

#[tokio::test]
async fn test_admin_reaches_admin_only_method() {
    let (service, calls) = gated_service();
    let token = tokens().issue("admin1", Role::Admin).unwrap();

    let response = service.oneshot(request(CREATE, Some(&token))).await.unwrap();

    assert!(status_of(&response).is_none());
    assert_eq!(response.headers().get("x-caller").unwrap(), "admin1");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_user_denied_admin_only_method() {
    let (service, calls) = gated_service();
    let token = tokens().issue("user1", Role::User).unwrap();

    let response = service.oneshot(request(CREATE, Some(&token))).await.unwrap();

    let status = status_of(&response).expect("rejection carries a status");
    assert_eq!(status.code(), Code::PermissionDenied);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "handler must not run");
}

#[tokio::test]
async fn test_user_allowed_shared_method() {
    let (service, calls) = gated_service();
    let token = tokens().issue("user1", Role::User).unwrap();

    let response = service.oneshot(request(RATE, Some(&token))).await.unwrap();

    assert!(status_of(&response).is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let (service, calls) = gated_service();

    let response = service.oneshot(request(RATE, None)).await.unwrap();

    let status = status_of(&response).unwrap();
    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_foreign_token_rejected() {
    let (service, calls) = gated_service();
    let foreign = TokenManager::new(b"someone-else", DEFAULT_TOKEN_TTL)
        .issue("admin1", Role::Admin)
        .unwrap();

    let response = service.oneshot(request(CREATE, Some(&foreign))).await.unwrap();

    assert_eq!(status_of(&response).unwrap().code(), Code::Unauthenticated);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (service, _calls) = gated_service();
    let issued = chrono::Utc::now() - chrono::Duration::hours(1);
    let expired = tokens().issue_at("admin1", Role::Admin, issued).unwrap();

    let response = service.oneshot(request(CREATE, Some(&expired))).await.unwrap();

    assert_eq!(status_of(&response).unwrap().code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_open_method_needs_no_token() {
    let (service, calls) = gated_service();

    let response = service.oneshot(request(SEARCH, None)).await.unwrap();

    assert!(status_of(&response).is_none());
    assert!(response.headers().get("x-caller").is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
