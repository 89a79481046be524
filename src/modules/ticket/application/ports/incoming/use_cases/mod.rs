pub mod create_ticket;
pub mod delete_ticket;
pub mod get_ticket;
pub mod list_tickets;
pub mod update_ticket;

pub use create_ticket::{CreateTicketCommand, CreateTicketError, CreateTicketUseCase};
pub use delete_ticket::{DeleteTicketError, DeleteTicketUseCase};
pub use get_ticket::{GetTicketError, GetTicketUseCase};
pub use list_tickets::{ListTicketsError, ListTicketsUseCase};
pub use update_ticket::{UpdateTicketCommand, UpdateTicketError, UpdateTicketUseCase};
