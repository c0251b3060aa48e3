//! # Staffportal (Employee Records & Scheduling Portal)
//!
//! `staffportal` is a minimal internal portal for employee records and
//! scheduling affiliation data. It serves server-rendered pages over a
//! cookie-session authentication gate backed by Postgres.
//!
//! ## Sessions
//!
//! Session state lives entirely in a signed cookie; there is no server-side
//! session store. The cookie carries the `authenticated` and `admin` flags
//! plus the employee's display name, authenticated with HMAC-SHA256 under a
//! secret the server never transmits.
//!
//! ## Authorization
//!
//! The employee listing and subject management are admin-gated: both the
//! `authenticated` and `admin` session flags must be set. Unknown emails and
//! wrong passwords are both answered with `404 Not Found` so the portal never
//! confirms whether an account exists.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
