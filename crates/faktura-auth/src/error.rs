//! Authentication error types.

use faktura_core::error::FakturaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for FakturaError {
    fn from(err: AuthError) -> Self {
        match err {
            // Unknown user and wrong password collapse into the same
            // low-information failure.
            AuthError::InvalidCredentials => FakturaError::invalid_credentials(),
            AuthError::Crypto(msg) => FakturaError::Internal(format!("cryptography error: {msg}")),
        }
    }
}
