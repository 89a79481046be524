use actix_web::{get, web, Responder};
use tracing::error;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::user::application::domain::entities::UserView;
use crate::modules::user::application::ports::incoming::use_cases::GetUserError;
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

/// Get a user
///
/// Users may read their own profile; admins may read any.
#[utoipa::path(
    get,
    path = "/api/auth/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user", body = UserView),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    )
)]
#[get("/{id}")]
pub async fn get_user_handler(
    user: CurrentUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();

    match data.users.get_single.execute(&user, &user_id).await {
        Ok(view) => ApiResponse::ok(view),

        Err(GetUserError::Forbidden) => {
            ApiResponse::forbidden("FORBIDDEN", "You are not allowed to view this user")
        }

        Err(GetUserError::NotFound) => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),

        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to fetch user");
            ApiResponse::internal_error()
        }
    }
}
