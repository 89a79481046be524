use async_trait::async_trait;

use crate::modules::user::application::domain::entities::UserView;

//
// ──────────────────────────────────────────────────────────
// Command / Result
// ──────────────────────────────────────────────────────────
//

/// Raw registration input. Validation happens in the service.
#[derive(Debug, Clone, Default)]
pub struct CreateUserCommand {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: Option<String>,
    pub dash_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: UserView,
    pub token: String,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    Validation(String),

    #[error("duplicate {0}")]
    DuplicateKey(String),

    #[error("repository error: {0}")]
    RepositoryError(String),

    #[error("internal error: {0}")]
    Internal(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

#[async_trait]
pub trait CreateUserUseCase: Send + Sync {
    async fn execute(&self, command: CreateUserCommand) -> Result<CreatedUser, CreateUserError>;
}
