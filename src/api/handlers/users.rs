//! Admin-gated employee listing.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::handlers::auth::session::load_session;
use crate::api::handlers::auth::SessionKeys;
use crate::api::handlers::session_error;
use crate::api::pages;
use crate::api::storage::all_employees;

/// `GET /users` — list every employee.
///
/// Requires an authenticated admin session; everyone else gets 401, with no
/// distinction between "not logged in" and "not an admin".
pub async fn users(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
) -> impl IntoResponse {
    let claims = match load_session(&headers, &keys) {
        Ok(claims) => claims,
        Err(err) => return session_error(&err),
    };

    if !claims.is_admin() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match all_employees(&pool).await {
        Ok(employees) => pages::users(&claims, &employees).into_response(),
        Err(err) => {
            error!("Failed to list employees: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
