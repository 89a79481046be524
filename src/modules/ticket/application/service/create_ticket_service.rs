use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::Collection;
use crate::modules::storage::application::ports::outgoing::StorageAdapter;
use crate::modules::ticket::application::domain::entities::{NewTicket, Ticket};
use crate::modules::ticket::application::ports::incoming::use_cases::{
    CreateTicketCommand, CreateTicketError, CreateTicketUseCase,
};
use crate::shared::validation::required_text;

use super::load_ticket;

pub struct CreateTicketService {
    storage: Arc<dyn StorageAdapter>,
}

impl CreateTicketService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CreateTicketUseCase for CreateTicketService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        command: CreateTicketCommand,
    ) -> Result<Ticket, CreateTicketError> {
        let ticket = NewTicket {
            title: required_text("title", &command.title).map_err(CreateTicketError::Validation)?,
            description: required_text("description", &command.description)
                .map_err(CreateTicketError::Validation)?,
            status: command.status.unwrap_or_default(),
            created_by: requester.id.clone(),
        };

        let ticket_id = self
            .storage
            .insert(Collection::Tickets, ticket.into_record(Utc::now()))
            .await
            .map_err(|e| CreateTicketError::RepositoryError(e.to_string()))?;

        info!(ticket_id = %ticket_id, created_by = %requester.id, "Ticket created");
        load_ticket(self.storage.as_ref(), &ticket_id)
            .await
            .map_err(|e| CreateTicketError::RepositoryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::application::domain::Filter;
    use crate::modules::ticket::application::domain::entities::TicketStatus;
    use crate::modules::user::application::domain::entities::Role;
    use crate::tests::support::fixtures::requester;
    use crate::tests::support::memory_store::InMemoryStore;

    #[tokio::test]
    async fn ticket_is_owned_by_requester_and_open() {
        let service = CreateTicketService::new(Arc::new(InMemoryStore::new()));

        let ticket = service
            .execute(
                &requester("u-1", Role::User),
                CreateTicketCommand {
                    title: "T".to_string(),
                    description: "D".to_string(),
                    status: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(ticket.created_by, "u-1");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(!ticket.ticket_id.is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let service = CreateTicketService::new(store.clone());

        let result = service
            .execute(
                &requester("u-1", Role::User),
                CreateTicketCommand {
                    title: "   ".to_string(),
                    description: "D".to_string(),
                    status: None,
                },
            )
            .await;

        assert_eq!(
            result,
            Err(CreateTicketError::Validation("title is required".to_string()))
        );
        assert_eq!(
            store
                .count(Collection::Tickets, &Filter::all())
                .await
                .unwrap(),
            0
        );
    }
}
