use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use crate::modules::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::user::application::domain::entities::{NewUser, User, DEFAULT_DASH_TYPE};
use crate::modules::user::application::ports::incoming::use_cases::{
    CreateUserCommand, CreateUserError, CreateUserUseCase, CreatedUser,
};
use crate::shared::validation::{normalize_email, parse_phone, required_text};

//
// ──────────────────────────────────────────────────────────
// Service
// ──────────────────────────────────────────────────────────
//

pub struct CreateUserService {
    storage: Arc<dyn StorageAdapter>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
}

impl CreateUserService {
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

    fn validate(command: CreateUserCommand) -> Result<(NewUser, String), CreateUserError> {
        let fullname = required_text("fullname", &command.fullname);
        let username = required_text("username", &command.username);
        let email = normalize_email(&command.email);
        let phone = parse_phone(&command.phone);
        if command.password.trim().is_empty() {
            return Err(CreateUserError::Validation("password is required".to_string()));
        }

        let user = NewUser {
            fullname: fullname.map_err(CreateUserError::Validation)?,
            username: username.map_err(CreateUserError::Validation)?,
            email: email.map_err(CreateUserError::Validation)?,
            password_hash: String::new(),
            phone: phone.map_err(CreateUserError::Validation)?,
            address: command
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            dash_type: command
                .dash_type
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DASH_TYPE.to_string()),
        };
        Ok((user, command.password))
    }
}

#[async_trait]
impl CreateUserUseCase for CreateUserService {
    async fn execute(&self, command: CreateUserCommand) -> Result<CreatedUser, CreateUserError> {
        let (mut new_user, password) = Self::validate(command)?;

        new_user.password_hash = self
            .hasher
            .hash_password(&password)
            .await
            .map_err(|e| CreateUserError::Internal(e.to_string()))?;

        let id = self
            .storage
            .insert(Collection::Users, new_user.into_record(Utc::now()))
            .await
            .map_err(|e| match e {
                StorageError::DuplicateKey { field } => CreateUserError::DuplicateKey(field),
                other => CreateUserError::RepositoryError(other.to_string()),
            })?;

        let record = self
            .storage
            .find_one(Collection::Users, &Filter::eq("id", id.as_str()))
            .await
            .map_err(|e| CreateUserError::RepositoryError(e.to_string()))?;
        let user = User::from_record(&record)
            .map_err(|e| CreateUserError::RepositoryError(e.to_string()))?;

        let token = self.tokens.issue_token(&user.id, None).map_err(|e| {
            error!(error = %e, user_id = %user.id, "Failed to issue token for new user");
            CreateUserError::Internal(e.to_string())
        })?;

        info!(user_id = %user.id, "User created");
        Ok(CreatedUser {
            user: user.view(),
            token,
        })
    }
}
