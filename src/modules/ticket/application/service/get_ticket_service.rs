use std::sync::Arc;

use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::ticket::application::domain::entities::Ticket;
use crate::modules::ticket::application::ports::incoming::use_cases::{
    GetTicketError, GetTicketUseCase,
};

use super::load_ticket;

pub struct GetTicketService {
    storage: Arc<dyn StorageAdapter>,
}

impl GetTicketService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl GetTicketUseCase for GetTicketService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        ticket_id: &str,
    ) -> Result<Ticket, GetTicketError> {
        let ticket = load_ticket(self.storage.as_ref(), ticket_id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => GetTicketError::NotFound,
                other => GetTicketError::RepositoryError(other.to_string()),
            })?;

        if !requester.may_act_on(&ticket.created_by) {
            return Err(GetTicketError::Forbidden);
        }
        Ok(ticket)
    }
}
