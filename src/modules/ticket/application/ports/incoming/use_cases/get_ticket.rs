use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::ticket::application::domain::entities::Ticket;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GetTicketError {
    #[error("not allowed to view this ticket")]
    Forbidden,

    #[error("ticket not found")]
    NotFound,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait GetTicketUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        ticket_id: &str,
    ) -> Result<Ticket, GetTicketError>;
}
