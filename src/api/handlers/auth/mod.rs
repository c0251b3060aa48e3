//! Authentication: password hashing, signed-cookie sessions, and the
//! login/logout/sign-up handlers.

pub mod login;
pub mod logout;
pub mod password;
pub mod session;
pub mod signup;

pub use self::session::{SessionConfig, SessionKeys};
