//! Authentication service.

use faktura_core::error::FakturaResult;
use faktura_core::logging::mask_email;
use faktura_core::models::user::UserDto;
use faktura_core::repository::UserRepository;
use faktura_core::validation;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;

/// Authenticates users by email + password.
///
/// Generic over the user repository so that this crate has no dependency
/// on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Authenticate a user and return their public projection.
    ///
    /// An unknown email and a wrong password produce the identical
    /// observable failure, so callers cannot enumerate accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> FakturaResult<UserDto> {
        validation::validate_not_blank("email", email)?;
        validation::validate_not_blank("password", password)?;
        validation::validate_email(email)?;

        debug!(email = %mask_email(email), "authentication attempt");

        let Some(user) = self.user_repo.find_by_email(email).await? else {
            debug!(email = %mask_email(email), "authentication failed: user not found");
            return Err(AuthError::InvalidCredentials.into());
        };

        let valid =
            password::verify_password(password, &user.password_hash, self.config.pepper.as_deref())?;
        if !valid {
            debug!(email = %mask_email(email), "authentication failed: password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "authentication successful");
        Ok(UserDto::from(&user))
    }
}
