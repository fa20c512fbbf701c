/// Authentication primitives for Makerfolio
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing, verification, and length policy
/// - [`session`]: Opaque-token sessions behind a pluggable [`session::SessionStore`]
///
/// # Security Notes
///
/// - Passwords are hashed with Argon2id; plaintext is never stored or logged.
/// - Session tokens are 32 random bytes from the OS RNG, hex-encoded.
/// - Password verification is constant-time via the argon2 crate.

pub mod password;
pub mod session;
