use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::Collection;
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::ticket::application::domain::entities::{Ticket, TicketChanges};
use crate::modules::ticket::application::ports::incoming::use_cases::{
    UpdateTicketCommand, UpdateTicketError, UpdateTicketUseCase,
};
use crate::shared::validation::required_text;

use super::load_ticket;

pub struct UpdateTicketService {
    storage: Arc<dyn StorageAdapter>,
}

impl UpdateTicketService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

fn map_storage(err: StorageError) -> UpdateTicketError {
    match err {
        StorageError::NotFound => UpdateTicketError::NotFound,
        other => UpdateTicketError::RepositoryError(other.to_string()),
    }
}

#[async_trait]
impl UpdateTicketUseCase for UpdateTicketService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        ticket_id: &str,
        command: UpdateTicketCommand,
    ) -> Result<Ticket, UpdateTicketError> {
        let changes = TicketChanges {
            title: command
                .title
                .map(|t| required_text("title", &t))
                .transpose()
                .map_err(UpdateTicketError::Validation)?,
            description: command
                .description
                .map(|d| required_text("description", &d))
                .transpose()
                .map_err(UpdateTicketError::Validation)?,
            status: command.status,
        };
        if changes.is_empty() {
            return Err(UpdateTicketError::Validation(
                "at least one of title, description or status must be provided".to_string(),
            ));
        }

        let current = load_ticket(self.storage.as_ref(), ticket_id)
            .await
            .map_err(map_storage)?;
        if !requester.may_act_on(&current.created_by) {
            return Err(UpdateTicketError::Forbidden);
        }

        self.storage
            .update(Collection::Tickets, ticket_id, changes.into_record(Utc::now()))
            .await
            .map_err(map_storage)?;

        info!(ticket_id = %ticket_id, updated_by = %requester.id, "Ticket updated");
        load_ticket(self.storage.as_ref(), ticket_id)
            .await
            .map_err(map_storage)
    }
}
