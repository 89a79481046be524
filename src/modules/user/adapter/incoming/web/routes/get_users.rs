use actix_web::{get, web, Responder};
use tracing::error;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::user::application::domain::entities::UserView;
use crate::shared::api::{ApiError, ApiResponse, PageQuery, PaginatedResponse};
use crate::AppState;

/// List users
///
/// Paginated list of every user, oldest first.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = "users",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of users", body = PaginatedResponse<UserView>),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[get("")]
pub async fn get_users_handler(
    _user: CurrentUser,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.users.get_list.execute(query.to_request()).await {
        Ok(page) => ApiResponse::ok(PaginatedResponse::from(page)),
        Err(e) => {
            error!(error = %e, "Failed to list users");
            ApiResponse::internal_error()
        }
    }
}
