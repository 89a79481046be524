use actix_web::{get, web, Responder};
use tracing::error;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::ticket::application::domain::entities::Ticket;
use crate::modules::ticket::application::ports::incoming::use_cases::ListTicketsError;
use crate::shared::api::{ApiError, ApiResponse, PageQuery, PaginatedResponse};
use crate::AppState;

/// List one user's tickets
///
/// A user may only ask for their own id; admins may ask for anyone.
#[utoipa::path(
    get,
    path = "/api/auth/tickets/my/{id}",
    tag = "tickets",
    params(
        ("id" = String, Path, description = "Owning user identifier"),
        PageQuery
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of the user's tickets", body = PaginatedResponse<Ticket>),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[get("/my/{id}")]
pub async fn get_my_tickets_handler(
    user: CurrentUser,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let owner = path.into_inner();

    match data
        .tickets
        .get_list
        .execute(&user, Some(owner.as_str()), query.to_request())
        .await
    {
        Ok(page) => ApiResponse::ok(PaginatedResponse::from(page)),

        Err(ListTicketsError::Forbidden) => {
            ApiResponse::forbidden("FORBIDDEN", "You can only view your own tickets")
        }

        Err(e) => {
            error!(error = %e, owner = %owner, "Failed to list user tickets");
            ApiResponse::internal_error()
        }
    }
}
