//! Sign-up form and submission.

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

use super::password::hash_password;
use super::session::{load_session, SessionKeys};
use crate::api::handlers::{redirect_found, session_error, valid_email};
use crate::api::pages;
use crate::api::storage::{insert_employee, NewEmployee};

/// Raw sign-up form body; everything is optional so validation can report the
/// missing fields instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub affiliation: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated sign-up input; `username` stays optional.
#[derive(Debug)]
struct SignupRequest {
    email: String,
    first_name: String,
    last_name: String,
    affiliation: String,
    username: Option<String>,
    password: String,
}

impl SignupForm {
    /// Check presence of the required fields, collecting the names of any
    /// that are missing. No store access happens before this passes.
    fn validate(self) -> Result<SignupRequest, Vec<&'static str>> {
        let mut missing = Vec::new();
        let email = require(self.email, "email", &mut missing);
        let first_name = require(self.first_name, "first_name", &mut missing);
        let last_name = require(self.last_name, "last_name", &mut missing);
        let affiliation = require(self.affiliation, "affiliation", &mut missing);
        let password = require(self.password, "password", &mut missing);

        if missing.is_empty() {
            Ok(SignupRequest {
                email,
                first_name,
                last_name,
                affiliation,
                username: self.username,
                password,
            })
        } else {
            Err(missing)
        }
    }
}

fn require(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    value.unwrap_or_else(|| {
        missing.push(name);
        String::new()
    })
}

/// `GET /signup` — render the sign-up form.
pub async fn signup_form(
    headers: HeaderMap,
    keys: Extension<Arc<SessionKeys>>,
) -> impl IntoResponse {
    match load_session(&headers, &keys) {
        Ok(claims) => pages::signup(&claims).into_response(),
        Err(err) => session_error(&err),
    }
}

/// `POST /signup` — validate, hash, insert, redirect.
///
/// The insert is idempotent on email; a duplicate sign-up still redirects to
/// the index without hinting that the account already existed.
pub async fn signup(pool: Extension<PgPool>, payload: Option<Form<SignupForm>>) -> impl IntoResponse {
    let form = match payload {
        Some(Form(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let request = match form.validate() {
        Ok(request) => request,
        Err(missing) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Missing required fields: {}", missing.join(", ")),
            )
                .into_response();
        }
    };

    if !valid_email(&request.email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    // Hashing failures are input errors (oversized password), not server
    // faults.
    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let employee = NewEmployee {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        password_hash,
        affiliation: request.affiliation,
        username: request.username,
    };

    if let Err(err) = insert_employee(&pool, &employee).await {
        error!("Failed to insert employee: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    redirect_found("/")
}

#[cfg(test)]
mod tests {
    use super::SignupForm;

    fn full_form() -> SignupForm {
        SignupForm {
            email: Some("ada@example.com".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            affiliation: Some("Engineering".to_string()),
            username: None,
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn validate_accepts_full_form_without_username() {
        let request = full_form().validate().expect("valid form");
        assert_eq!(request.email, "ada@example.com");
        assert!(request.username.is_none());
    }

    #[test]
    fn validate_reports_each_missing_field() {
        let form = SignupForm {
            email: None,
            first_name: Some("Ada".to_string()),
            last_name: None,
            affiliation: None,
            username: None,
            password: Some("secret".to_string()),
        };
        let missing = form.validate().expect_err("missing fields");
        assert_eq!(missing, vec!["email", "last_name", "affiliation"]);
    }

    #[test]
    fn validate_keeps_optional_username() {
        let mut form = full_form();
        form.username = Some("ada".to_string());
        let request = form.validate().expect("valid form");
        assert_eq!(request.username.as_deref(), Some("ada"));
    }
}
