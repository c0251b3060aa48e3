//! Signed-cookie sessions.
//!
//! All session state lives in the cookie itself: a base64url JSON payload
//! plus an HMAC-SHA256 tag under a server-held secret. Nothing is stored
//! server side, so any instance holding the secret can authenticate any
//! request. Logout re-issues the cookie with `authenticated` dropped rather
//! than deleting it.

use anyhow::{anyhow, Context, Result};
use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::api::storage::Employee;

pub const SESSION_COOKIE_NAME: &str = "staffportal_session";

/// Default cookie lifetime: 30 days.
const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

type HmacSha256 = Hmac<Sha256>;

/// Server-held secret used to authenticate session cookies.
pub struct SessionKeys {
    secret: SecretString,
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length")
    }
}

/// Cookie issuing policy.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    cookie_secure: bool,
    ttl_seconds: i64,
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cookie_secure: false,
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-held session state. Everything here round-trips through the
/// cookie; the HMAC tag is what makes the flags trustworthy.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SessionClaims {
    pub authenticated: bool,
    pub admin: bool,
    pub first_name: String,
    pub last_name: String,
}

impl SessionClaims {
    /// Mark the session authenticated and copy the employee's display fields
    /// and admin flag.
    pub fn set_authenticated(&mut self, employee: &Employee) {
        self.authenticated = true;
        self.admin = employee.admin;
        self.first_name = employee.first_name.clone();
        self.last_name = employee.last_name.clone();
    }

    /// Log the session out in place. Only the `authenticated` flag is
    /// dropped; the remaining values are kept as-is.
    pub fn clear(&mut self) {
        self.authenticated = false;
    }

    /// True only when both the `authenticated` and `admin` flags are set.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.authenticated && self.admin
    }
}

/// Serialize and sign claims into a cookie value (`payload.tag`).
///
/// # Errors
///
/// Returns an error when the claims cannot be serialized.
pub fn encode_claims(keys: &SessionKeys, claims: &SessionClaims) -> Result<String> {
    let json = serde_json::to_vec(claims).context("failed to serialize session claims")?;
    let payload = URL_SAFE_NO_PAD.encode(json);
    let mut mac = keys.mac();
    mac.update(payload.as_bytes());
    let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{payload}.{tag}"))
}

/// Verify a cookie value and deserialize its claims.
///
/// # Errors
///
/// Returns an error when the value is malformed or the tag does not verify.
pub fn decode_claims(keys: &SessionKeys, value: &str) -> Result<SessionClaims> {
    let (payload, tag) = value
        .split_once('.')
        .ok_or_else(|| anyhow!("malformed session cookie"))?;
    let tag = URL_SAFE_NO_PAD
        .decode(tag)
        .context("malformed session cookie tag")?;
    let mut mac = keys.mac();
    mac.update(payload.as_bytes());
    // Constant-time comparison; a forged or truncated tag fails here.
    mac.verify_slice(&tag)
        .map_err(|_| anyhow!("session cookie failed authentication"))?;
    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .context("malformed session cookie payload")?;
    serde_json::from_slice(&json).context("failed to deserialize session claims")
}

/// Load the session carried by the request, if any.
///
/// A missing cookie is an anonymous session. A cookie that is present but
/// fails authentication is an error; callers surface it as a server failure.
///
/// # Errors
///
/// Returns an error when a session cookie is present but cannot be verified.
pub fn load_session(headers: &HeaderMap, keys: &SessionKeys) -> Result<SessionClaims> {
    match extract_session_cookie(headers) {
        Some(value) => decode_claims(keys, &value),
        None => Ok(SessionClaims::default()),
    }
}

/// Build the `Set-Cookie` header for the given claims.
///
/// Every code path that mutates the session must attach this header; the
/// cookie is the only place session state lives.
///
/// # Errors
///
/// Returns an error when the claims cannot be serialized into a header value.
pub fn session_cookie(
    keys: &SessionKeys,
    config: &SessionConfig,
    claims: &SessionClaims,
) -> Result<HeaderValue> {
    let token = encode_claims(keys, claims)?;
    let ttl_seconds = config.ttl_seconds;
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build session cookie header")
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}
