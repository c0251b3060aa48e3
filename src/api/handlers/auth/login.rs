//! Login endpoint.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::password::verify_password;
use super::session::{session_cookie, SessionClaims, SessionConfig, SessionKeys};
use crate::api::handlers::redirect_found;
use crate::api::storage::employee_by_email;

/// Raw login form body; fields are optional so missing input maps to a 400
/// instead of an extraction failure.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /login` — verify credentials, mark the session authenticated, and
/// redirect home.
///
/// Unknown emails, wrong passwords, and malformed stored hashes are all
/// answered 404 so the portal never confirms whether an account exists.
pub async fn login(
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
    config: Extension<SessionConfig>,
    payload: Option<Form<LoginForm>>,
) -> impl IntoResponse {
    let form = match payload {
        Some(Form(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let (Some(email), Some(password)) = (form.email, form.password) else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing email or password".to_string(),
        )
            .into_response();
    };

    let employee = match employee_by_email(&pool, &email).await {
        Ok(Some(employee)) => employee,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to look up employee: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    // A malformed stored hash is indistinguishable from a mismatch here.
    let matches = verify_password(&password, &employee.password_hash).unwrap_or(false);
    if !matches {
        return StatusCode::NOT_FOUND.into_response();
    }

    let mut claims = SessionClaims::default();
    claims.set_authenticated(&employee);

    match session_cookie(&keys, &config, &claims) {
        Ok(cookie) => {
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            (headers, redirect_found("/")).into_response()
        }
        Err(err) => {
            error!("Failed to set session cookie: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
