use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::ticket::application::domain::entities::{Ticket, TicketStatus};

#[derive(Debug, Clone, Default)]
pub struct UpdateTicketCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpdateTicketError {
    #[error("{0}")]
    Validation(String),

    #[error("not allowed to update this ticket")]
    Forbidden,

    #[error("ticket not found")]
    NotFound,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

#[async_trait]
pub trait UpdateTicketUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        ticket_id: &str,
        command: UpdateTicketCommand,
    ) -> Result<Ticket, UpdateTicketError>;
}
