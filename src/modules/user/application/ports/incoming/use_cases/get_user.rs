use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::user::application::domain::entities::UserView;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GetUserError {
    #[error("not allowed to view this user")]
    Forbidden,

    #[error("user not found")]
    NotFound,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait GetUserUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        user_id: &str,
    ) -> Result<UserView, GetUserError>;
}
