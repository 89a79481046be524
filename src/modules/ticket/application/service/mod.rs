pub mod create_ticket_service;
pub mod delete_ticket_service;
pub mod get_ticket_service;
pub mod list_tickets_service;
pub mod update_ticket_service;

pub use create_ticket_service::CreateTicketService;
pub use delete_ticket_service::DeleteTicketService;
pub use get_ticket_service::GetTicketService;
pub use list_tickets_service::ListTicketsService;
pub use update_ticket_service::UpdateTicketService;

use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::ticket::application::domain::entities::Ticket;

async fn load_ticket(storage: &dyn StorageAdapter, ticket_id: &str) -> Result<Ticket, StorageError> {
    let record = storage
        .find_one(Collection::Tickets, &Filter::eq("ticket_id", ticket_id))
        .await?;
    Ticket::from_record(&record)
}
