use actix_web::{put, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::ticket::application::domain::entities::TicketStatus;
use crate::modules::ticket::application::ports::incoming::use_cases::{
    UpdateTicketCommand, UpdateTicketError,
};
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

use super::TicketEnvelope;

/// Fields a client may change. Ownership and identifiers are rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

/// Update a ticket
///
/// Partial update; only supplied fields change.
#[utoipa::path(
    put,
    path = "/api/auth/tickets/{id}",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket updated", body = TicketEnvelope),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 404, description = "Ticket not found", body = ApiError)
    )
)]
#[put("/{id}")]
pub async fn update_ticket_handler(
    user: CurrentUser,
    path: web::Path<String>,
    req: web::Json<UpdateTicketRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ticket_id = path.into_inner();
    let req = req.into_inner();
    let command = UpdateTicketCommand {
        title: req.title,
        description: req.description,
        status: req.status,
    };

    match data.tickets.update.execute(&user, &ticket_id, command).await {
        Ok(ticket) => ApiResponse::ok(TicketEnvelope::with_message(
            "Ticket updated successfully",
            ticket,
        )),

        Err(UpdateTicketError::Validation(msg)) => {
            ApiResponse::bad_request("VALIDATION_ERROR", &msg)
        }

        Err(UpdateTicketError::Forbidden) => {
            ApiResponse::forbidden("FORBIDDEN", "You can only update your own tickets")
        }

        Err(UpdateTicketError::NotFound) => {
            ApiResponse::not_found("TICKET_NOT_FOUND", "No ticket found to update")
        }

        Err(e) => {
            error!(error = %e, ticket_id = %ticket_id, "Failed to update ticket");
            ApiResponse::internal_error()
        }
    }
}
