use actix_web::{delete, web, Responder};
use tracing::error;

use crate::api::schemas::MessageResponse;
use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::user::application::ports::incoming::use_cases::DeleteUserError;
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

/// Delete a user
///
/// Tickets created by the user are kept.
#[utoipa::path(
    delete,
    path = "/api/auth/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    )
)]
#[delete("/{id}")]
pub async fn delete_user_handler(
    user: CurrentUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();

    match data.users.delete.execute(&user, &user_id).await {
        Ok(()) => ApiResponse::ok(MessageResponse::new("User deleted successfully")),

        Err(DeleteUserError::Forbidden) => {
            ApiResponse::forbidden("FORBIDDEN", "You are not allowed to delete this user")
        }

        Err(DeleteUserError::NotFound) => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),

        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to delete user");
            ApiResponse::internal_error()
        }
    }
}
