use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::{Page, PageRequest};
use crate::modules::ticket::application::domain::entities::Ticket;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListTicketsError {
    #[error("not allowed to list these tickets")]
    Forbidden,

    #[error("repository error: {0}")]
    RepositoryError(String),
}

/// Role-aware ticket listing. Without `owner`, admins get every ticket and
/// users get their own; with `owner`, only that user's tickets, which a
/// non-admin may ask for only about themselves.
#[async_trait]
pub trait ListTicketsUseCase: Send + Sync {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        owner: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Ticket>, ListTicketsError>;
}
