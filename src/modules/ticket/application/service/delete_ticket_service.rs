use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::Collection;
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::ticket::application::ports::incoming::use_cases::{
    DeleteTicketError, DeleteTicketUseCase,
};

use super::load_ticket;

pub struct DeleteTicketService {
    storage: Arc<dyn StorageAdapter>,
}

impl DeleteTicketService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

fn map_storage(err: StorageError) -> DeleteTicketError {
    match err {
        StorageError::NotFound => DeleteTicketError::NotFound,
        other => DeleteTicketError::RepositoryError(other.to_string()),
    }
}

#[async_trait]
impl DeleteTicketUseCase for DeleteTicketService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        ticket_id: &str,
    ) -> Result<(), DeleteTicketError> {
        let ticket = load_ticket(self.storage.as_ref(), ticket_id)
            .await
            .map_err(map_storage)?;
        if !requester.may_act_on(&ticket.created_by) {
            return Err(DeleteTicketError::Forbidden);
        }

        self.storage
            .delete(Collection::Tickets, ticket_id)
            .await
            .map_err(map_storage)?;

        info!(ticket_id = %ticket_id, deleted_by = %requester.id, "Ticket deleted");
        Ok(())
    }
}
