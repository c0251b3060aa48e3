use crate::api;
use crate::api::handlers::auth::{SessionConfig, SessionKeys};
use crate::cli::actions::Action;
use anyhow::{Context, Result};
use url::Url;

/// Execute the server action.
///
/// # Errors
///
/// Returns an error if the DSN is invalid or the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            session_secret,
            cookie_secure,
        } => {
            // Fail fast on malformed DSNs before touching the pool.
            Url::parse(&dsn).context("invalid database connection string")?;

            let keys = SessionKeys::new(session_secret);
            let config = SessionConfig::new().with_cookie_secure(cookie_secure);

            api::new(port, dsn, keys, config).await?;
        }
    }

    Ok(())
}
