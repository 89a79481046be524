use actix_web::{post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::ticket::application::domain::entities::{Ticket, TicketStatus};
use crate::modules::ticket::application::ports::incoming::use_cases::{
    CreateTicketCommand, CreateTicketError,
};
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

/// Fields other than these, `createdBy` included, are ignored; the owner
/// is always the caller.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTicketRequest {
    #[schema(example = "Printer on floor 3 is jammed")]
    pub title: String,
    #[schema(example = "Paper stuck in tray 2 since this morning")]
    pub description: String,
    /// Defaults to `Open`
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Ticket,
}

impl TicketEnvelope {
    pub fn with_message(message: &str, data: Ticket) -> Self {
        Self {
            message: Some(message.to_string()),
            data,
        }
    }

    pub fn data(data: Ticket) -> Self {
        Self {
            message: None,
            data,
        }
    }
}

/// Create a ticket
///
/// The ticket is owned by the caller.
#[utoipa::path(
    post,
    path = "/api/auth/tickets",
    tag = "tickets",
    request_body = CreateTicketRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket created", body = TicketEnvelope),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[post("")]
pub async fn create_ticket_handler(
    user: CurrentUser,
    req: web::Json<CreateTicketRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let command = CreateTicketCommand {
        title: req.title,
        description: req.description,
        status: req.status,
    };

    match data.tickets.create.execute(&user, command).await {
        Ok(ticket) => ApiResponse::ok(TicketEnvelope::with_message(
            "Ticket created successfully",
            ticket,
        )),

        Err(CreateTicketError::Validation(msg)) => {
            ApiResponse::bad_request("VALIDATION_ERROR", &msg)
        }

        Err(e) => {
            error!(error = %e, requester = %user.id, "Failed to create ticket");
            ApiResponse::internal_error()
        }
    }
}
