//! User registration and removal.

use faktura_auth::config::AuthConfig;
use faktura_auth::password;
use faktura_core::error::{FakturaError, FakturaResult};
use faktura_core::logging::mask_email;
use faktura_core::models::user::{RegisterUser, User, UserDto};
use faktura_core::repository::UserRepository;
use faktura_core::validation;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct UserService<U: UserRepository> {
    user_repo: U,
    auth_config: AuthConfig,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(user_repo: U, auth_config: AuthConfig) -> Self {
        Self {
            user_repo,
            auth_config,
        }
    }

    /// Register a new user. The raw password is validated, hashed with
    /// Argon2id, and only the digest is persisted.
    pub async fn register(&self, input: RegisterUser) -> FakturaResult<UserDto> {
        debug!(email = %mask_email(&input.email), "user registration started");

        validation::validate_person_name("first_name", &input.first_name)?;
        validation::validate_person_name("last_name", &input.last_name)?;
        validation::validate_email(&input.email)?;
        validation::validate_password(&input.password)?;

        if self.user_repo.exists_by_email(&input.email).await? {
            warn!(
                email = %mask_email(&input.email),
                "user registration failed: email already registered"
            );
            return Err(FakturaError::business_rule(
                "User with email already exists",
                "EMAIL_ALREADY_EXISTS",
            ));
        }

        let password_hash =
            password::hash_password(&input.password, self.auth_config.pepper.as_deref())?;
        let user = User::new(input.first_name, input.last_name, input.email, password_hash)?;
        let created = self.user_repo.create(&user).await?;

        info!(user_id = %created.id, "user registered successfully");
        Ok(UserDto::from(&created))
    }

    pub async fn get(&self, user_id: Uuid) -> FakturaResult<UserDto> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| FakturaError::not_found("User", user_id))?;
        Ok(UserDto::from(&user))
    }

    pub async fn delete(&self, user_id: Uuid) -> FakturaResult<()> {
        debug!(%user_id, "user deletion requested");

        let user = self.user_repo.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(%user_id, "user deletion failed: user not found");
            FakturaError::not_found("User", user_id)
        })?;

        self.user_repo.delete(user.id).await?;
        info!(%user_id, "user deleted successfully");
        Ok(())
    }
}
