//! Error types for the faktura system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FakturaError {
    #[error("{entity} not found with identifier: {id}")]
    NotFound { entity: String, id: String },

    #[error("{message}")]
    Validation {
        field: String,
        message: String,
        code: String,
    },

    #[error("{message}")]
    BusinessRule { message: String, code: String },

    #[error("authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl FakturaError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }

    pub fn business_rule(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
            code: code.into(),
        }
    }

    /// The one credential failure exposed to callers. Unknown email and
    /// wrong password produce this identical value.
    pub fn invalid_credentials() -> Self {
        Self::AuthenticationFailed {
            reason: "invalid email or password".into(),
        }
    }

    /// Machine code carried by validation and business-rule failures.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Validation { code, .. } | Self::BusinessRule { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type FakturaResult<T> = Result<T, FakturaError>;
