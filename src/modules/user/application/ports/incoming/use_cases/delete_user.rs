use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeleteUserError {
    #[error("not allowed to delete this user")]
    Forbidden,

    #[error("user not found")]
    NotFound,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

/// Removes the user record. Tickets the user created are kept.
#[async_trait]
pub trait DeleteUserUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        user_id: &str,
    ) -> Result<(), DeleteUserError>;
}
