//! Scheduling subject listing and management.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::handlers::auth::session::load_session;
use crate::api::handlers::auth::SessionKeys;
use crate::api::handlers::{redirect_found, session_error};
use crate::api::pages;
use crate::api::storage::{all_subjects, insert_subject};

#[derive(Debug, Deserialize)]
pub struct SubjectForm {
    pub name: Option<String>,
}

/// `GET /subjects` — list scheduling subjects for any signed-in employee.
pub async fn subjects(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
) -> impl IntoResponse {
    let claims = match load_session(&headers, &keys) {
        Ok(claims) => claims,
        Err(err) => return session_error(&err),
    };

    if !claims.authenticated {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match all_subjects(&pool).await {
        Ok(subjects) => pages::subjects(&claims, &subjects).into_response(),
        Err(err) => {
            error!("Failed to list subjects: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// `POST /subjects` — add a subject (admin only).
///
/// The insert is idempotent on name; re-adding an existing subject still
/// redirects back to the listing.
pub async fn create_subject(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<SessionKeys>>,
    payload: Option<Form<SubjectForm>>,
) -> impl IntoResponse {
    let claims = match load_session(&headers, &keys) {
        Ok(claims) => claims,
        Err(err) => return session_error(&err),
    };

    if !claims.is_admin() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let form = match payload {
        Some(Form(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let Some(name) = form.name else {
        return (StatusCode::BAD_REQUEST, "Missing subject name".to_string()).into_response();
    };

    if let Err(err) = insert_subject(&pool, &name).await {
        error!("Failed to insert subject: {err}");
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }

    redirect_found("/subjects")
}
