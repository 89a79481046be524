use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::ticket::application::domain::entities::{Ticket, TicketStatus};

#[derive(Debug, Clone, Default)]
pub struct CreateTicketCommand {
    pub title: String,
    pub description: String,
    pub status: Option<TicketStatus>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreateTicketError {
    #[error("{0}")]
    Validation(String),

    #[error("repository error: {0}")]
    RepositoryError(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

/// Creates a ticket owned by `requester`.
#[async_trait]
pub trait CreateTicketUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        command: CreateTicketCommand,
    ) -> Result<Ticket, CreateTicketError>;
}
