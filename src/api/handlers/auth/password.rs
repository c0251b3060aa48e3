//! Password hashing and verification for employee credentials.

use anyhow::{bail, Context, Result};

/// Fixed bcrypt work factor for newly stored hashes.
pub const BCRYPT_COST: u32 = 14;

/// bcrypt only reads the first 72 bytes of input; longer passwords are
/// rejected instead of silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a plaintext password with a per-call random salt.
///
/// # Errors
///
/// Returns an error when the input exceeds [`MAX_PASSWORD_BYTES`] or hashing
/// fails.
pub fn hash_password(plain: &str) -> Result<String> {
    if plain.len() > MAX_PASSWORD_BYTES {
        bail!("password exceeds {MAX_PASSWORD_BYTES} bytes");
    }
    bcrypt::hash(plain, BCRYPT_COST).context("failed to hash password")
}

/// Check a plaintext password against a stored hash.
///
/// Returns `Ok(false)` on a clean mismatch. A malformed stored hash is an
/// error; callers answer it as Not Found rather than a server failure.
///
/// # Errors
///
/// Returns an error when the stored hash cannot be parsed.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(plain, hash).context("failed to verify password")
}
