use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::user::application::domain::entities::{Role, UserView};

//
// ──────────────────────────────────────────────────────────
// Command
// ──────────────────────────────────────────────────────────
//

/// Partial update; `None` fields are left as stored.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub dash_type: Option<String>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpdateUserError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("user not found")]
    NotFound,

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
pub trait UpdateUserUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        user_id: &str,
        command: UpdateUserCommand,
    ) -> Result<UserView, UpdateUserError>;
}
