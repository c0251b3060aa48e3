//! Portal landing page.

use axum::{extract::Extension, http::HeaderMap, response::IntoResponse};
use std::sync::Arc;

use crate::api::handlers::auth::session::load_session;
use crate::api::handlers::auth::SessionKeys;
use crate::api::handlers::session_error;
use crate::api::pages;

/// `GET /` — render the landing page annotated with the caller's auth flags.
pub async fn index(headers: HeaderMap, keys: Extension<Arc<SessionKeys>>) -> impl IntoResponse {
    match load_session(&headers, &keys) {
        Ok(claims) => pages::index(&claims).into_response(),
        Err(err) => session_error(&err),
    }
}
