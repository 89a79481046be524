mod create_ticket;
mod delete_ticket;
mod get_my_tickets;
mod get_ticket;
mod get_tickets;
mod update_ticket;

use actix_web::web;

pub use create_ticket::*;
pub use delete_ticket::*;
pub use get_my_tickets::*;
pub use get_ticket::*;
pub use get_tickets::*;
pub use update_ticket::*;

pub const TICKET_SCOPE: &str = "/api/auth/tickets";

/// Registers the ticket handlers, relative to [`TICKET_SCOPE`]. `/my/{id}`
/// is registered ahead of `/{id}`.
pub fn ticket_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_my_tickets_handler)
        .service(get_tickets_handler)
        .service(create_ticket_handler)
        .service(get_ticket_handler)
        .service(update_ticket_handler)
        .service(delete_ticket_handler);
}
