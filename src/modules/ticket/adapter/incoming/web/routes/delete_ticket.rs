use actix_web::{delete, web, Responder};
use tracing::error;

use crate::api::schemas::MessageResponse;
use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::ticket::application::ports::incoming::use_cases::DeleteTicketError;
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

/// Delete a ticket
#[utoipa::path(
    delete,
    path = "/api/auth/tickets/{id}",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 404, description = "Ticket not found", body = ApiError)
    )
)]
#[delete("/{id}")]
pub async fn delete_ticket_handler(
    user: CurrentUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ticket_id = path.into_inner();

    match data.tickets.delete.execute(&user, &ticket_id).await {
        Ok(()) => ApiResponse::ok(MessageResponse::new("Ticket deleted successfully")),

        Err(DeleteTicketError::Forbidden) => {
            ApiResponse::forbidden("FORBIDDEN", "You can only delete your own tickets")
        }

        Err(DeleteTicketError::NotFound) => {
            ApiResponse::not_found("TICKET_NOT_FOUND", "Ticket not found")
        }

        Err(e) => {
            error!(error = %e, ticket_id = %ticket_id, "Failed to delete ticket");
            ApiResponse::internal_error()
        }
    }
}
