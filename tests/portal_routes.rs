//! Handler tests exercising the router up to (but not including) the
//! database: validation failures, session gating, redirects, and cookie
//! handling.
//!
//! The pool is created with `connect_lazy`, so no live database is needed;
//! every request here returns before a query would run.

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    Extension, Router,
};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use staffportal::api::{
    self,
    handlers::auth::{
        session::{decode_claims, encode_claims, SessionClaims, SESSION_COOKIE_NAME},
        SessionConfig, SessionKeys,
    },
};
use std::sync::Arc;
use tower::ServiceExt;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn keys() -> SessionKeys {
    SessionKeys::new(SecretString::from("test-secret".to_string()))
}

fn test_router() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost:5432/staffportal_test")
        .expect("lazy pool");
    api::router()
        .layer(Extension(Arc::new(keys())))
        .layer(Extension(SessionConfig::new()))
        .layer(Extension(pool))
}

fn session_cookie_header(claims: &SessionClaims) -> String {
    let token = encode_claims(&keys(), claims).expect("encode claims");
    format!("{SESSION_COOKIE_NAME}={token}")
}

fn authenticated_claims(admin: bool) -> SessionClaims {
    SessionClaims {
        authenticated: true,
        admin,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn index_renders_for_anonymous_visitors() {
    let response = test_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Sign up"));
    assert!(body.contains("action=\"/login\""));
}

#[tokio::test]
async fn index_greets_authenticated_visitors() {
    let request = Request::builder()
        .uri("/")
        .header(COOKIE, session_cookie_header(&authenticated_claims(false)))
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Welcome back, Ada"));
}

#[tokio::test]
async fn index_with_tampered_cookie_is_a_server_error() {
    let request = Request::builder()
        .uri("/")
        .header(COOKIE, format!("{SESSION_COOKIE_NAME}=forged.AAAA"))
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn signup_form_renders() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/signup")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("name=\"affiliation\""));
}

#[tokio::test]
async fn signup_missing_affiliation_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/signup")
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from(
            "email=a%40b.com&first_name=A&last_name=B&password=secret",
        ))
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("affiliation"));
}

#[tokio::test]
async fn signup_with_invalid_email_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/signup")
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from(
            "email=not-an-email&first_name=A&last_name=B&affiliation=X&password=secret",
        ))
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_missing_password_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from("email=a%40b.com"))
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn users_without_a_session_is_unauthorized() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn users_with_a_non_admin_session_is_unauthorized() {
    let request = Request::builder()
        .uri("/users")
        .header(COOKIE, session_cookie_header(&authenticated_claims(false)))
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_flag_and_redirects_home() {
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(COOKIE, session_cookie_header(&authenticated_claims(true)))
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some("/")
    );

    // The cookie is re-issued, not deleted; only the flag changes.
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("logout re-issues the session cookie");
    let token = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value)
        .expect("cookie value");
    let claims = decode_claims(&keys(), token).expect("decode re-issued cookie");
    assert!(!claims.authenticated);
    assert_eq!(claims.first_name, "Ada");
}

#[tokio::test]
async fn logout_without_a_session_still_redirects() {
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn subjects_unauthenticated_is_unauthorized() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/subjects")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_subject_requires_an_admin_session() {
    let request = Request::builder()
        .method("POST")
        .uri("/subjects")
        .header(COOKIE, session_cookie_header(&authenticated_claims(false)))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::from("name=maths"))
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_subject_missing_name_is_a_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/subjects")
        .header(COOKIE, session_cookie_header(&authenticated_claims(true)))
        .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
        .body(Body::empty())
        .unwrap();
    let response = test_router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_build_info() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));
    let body = body_string(response).await;
    assert!(body.contains("\"name\":\"staffportal\""));
}
