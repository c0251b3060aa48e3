//! Logout endpoint.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
};
use std::sync::Arc;

use super::session::{load_session, session_cookie, SessionConfig, SessionKeys};
use crate::api::handlers::{redirect_found, session_error};

/// `POST /logout` — drop the `authenticated` flag and redirect home.
///
/// The cookie is re-issued rather than deleted; only the flag changes, the
/// remaining values stay in place.
pub async fn logout(
    headers: HeaderMap,
    keys: Extension<Arc<SessionKeys>>,
    config: Extension<SessionConfig>,
) -> impl IntoResponse {
    let mut claims = match load_session(&headers, &keys) {
        Ok(claims) => claims,
        Err(err) => return session_error(&err),
    };

    claims.clear();

    match session_cookie(&keys, &config, &claims) {
        Ok(cookie) => {
            let mut response_headers = HeaderMap::new();
            response_headers.insert(SET_COOKIE, cookie);
            (response_headers, redirect_found("/")).into_response()
        }
        Err(err) => session_error(&err),
    }
}
