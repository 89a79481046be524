use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::{Collection, Page, PageRequest};
use crate::modules::storage::application::ports::outgoing::StorageAdapter;
use crate::modules::ticket::application::domain::entities::{Ticket, TicketScope};
use crate::modules::ticket::application::ports::incoming::use_cases::{
    ListTicketsError, ListTicketsUseCase,
};

pub struct ListTicketsService {
    storage: Arc<dyn StorageAdapter>,
}

impl ListTicketsService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ListTicketsUseCase for ListTicketsService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        owner: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Ticket>, ListTicketsError> {
        let scope = TicketScope::resolve(requester, owner).ok_or_else(|| {
            warn!(requester = %requester.id, owner = ?owner, "Refused listing of foreign tickets");
            ListTicketsError::Forbidden
        })?;

        let (records, total) = self
            .storage
            .find_many(Collection::Tickets, &scope.filter(), page)
            .await
            .map_err(|e| ListTicketsError::RepositoryError(e.to_string()))?;

        let tickets = records
            .iter()
            .map(Ticket::from_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ListTicketsError::RepositoryError(e.to_string()))?;

        Ok(Page::new(tickets, page, total))
    }
}
