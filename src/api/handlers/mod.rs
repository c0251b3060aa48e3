//! Route handlers and shared helpers for the portal.

pub mod auth;
pub mod health;
pub mod index;
pub mod subjects;
pub mod users;

pub use self::auth::login::login;
pub use self::auth::logout::logout;
pub use self::auth::signup::{signup, signup_form};
pub use self::health::health;
pub use self::index::index;
pub use self::subjects::{create_subject, subjects};
pub use self::users::users;

use axum::{
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use regex::Regex;
use tracing::error;

/// Lightweight email sanity check used by sign-up before persisting data.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// `302 Found` redirect; the form flows deliberately use the classic status
/// rather than axum's 303/307 helpers.
pub(crate) fn redirect_found(location: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, HeaderValue::from_static(location));
    (StatusCode::FOUND, headers).into_response()
}

/// Map a session codec failure to the 500 the route table promises. The error
/// text is surfaced verbatim, matching the portal's unsanitized error policy.
pub(crate) fn session_error(err: &anyhow::Error) -> Response {
    error!("Failed to load session: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
