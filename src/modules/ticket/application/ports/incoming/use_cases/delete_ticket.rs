use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeleteTicketError {
    #[error("not allowed to delete this ticket")]
    Forbidden,

    #[error("ticket not found")]
    NotFound,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait DeleteTicketUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        ticket_id: &str,
    ) -> Result<(), DeleteTicketError>;
}
