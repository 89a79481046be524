use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::modules::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::user::application::domain::entities::User;
use crate::modules::user::application::ports::incoming::use_cases::{
    LoginError, LoginUserCommand, LoginUserUseCase,
};

pub struct LoginUserService {
    storage: Arc<dyn StorageAdapter>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
}

impl LoginUserService {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            storage,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl LoginUserUseCase for LoginUserService {
    async fn execute(&self, command: LoginUserCommand) -> Result<String, LoginError> {
        let email = command
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        let password = command.password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(LoginError::Validation(
                "email and password are required".to_string(),
            ));
        };

        let record = match self
            .storage
            .find_one(Collection::Users, &Filter::eq("email", email.as_str()))
            .await
        {
            Ok(record) => record,
            Err(StorageError::NotFound) => {
                info!("Login attempt for unknown email");
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => return Err(LoginError::RepositoryError(e.to_string())),
        };
        let user =
            User::from_record(&record).map_err(|e| LoginError::RepositoryError(e.to_string()))?;

        let matches = self
            .hasher
            .verify_password(&password, &user.password_hash)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user.id, "Stored password digest is unusable");
                LoginError::Internal(e.to_string())
            })?;
        if !matches {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(LoginError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue_token(&user.id, Some(&user.email))
            .map_err(|e| LoginError::Internal(e.to_string()))?;

        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }
}
