//! Authentication configuration.

/// Configuration for password hashing and authentication.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Optional server-side secret prepended to passwords before
    /// Argon2id hashing. Must be identical at hash and verify time.
    pub pepper: Option<String>,
}
