use actix_web::{post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::api::schemas::PhoneInput;
use crate::modules::user::application::domain::entities::UserView;
use crate::modules::user::application::ports::incoming::use_cases::{
    CreateUserCommand, CreateUserError,
};
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

//
// ──────────────────────────────────────────────────────────
// Request / Response DTO
// ──────────────────────────────────────────────────────────
//

/// Registration body. A `role` sent by the client is ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Jane Doe")]
    pub fullname: String,
    #[schema(example = "jane")]
    pub username: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "s3cret-pass")]
    pub password: String,
    pub phone: PhoneInput,
    pub address: Option<String>,
    #[schema(example = "user_dashboard")]
    pub dash_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub token: String,
    pub user: UserView,
}

//
// ──────────────────────────────────────────────────────────
// Handler
// ──────────────────────────────────────────────────────────
//

/// Register a user
///
/// Creates a user with the `user` role and returns a token for it.
#[utoipa::path(
    post,
    path = "/api/auth/user",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 409, description = "Username or email already taken", body = ApiError),
        (status = 429, description = "Rate limited", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[post("")]
pub async fn create_user_handler(
    req: web::Json<CreateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let command = CreateUserCommand {
        fullname: req.fullname,
        username: req.username,
        email: req.email,
        password: req.password,
        phone: req.phone.into_raw(),
        address: req.address,
        dash_type: req.dash_type,
    };

    match data.users.create.execute(command).await {
        Ok(created) => ApiResponse::ok(CreateUserResponse {
            message: "User created successfully".to_string(),
            token: created.token,
            user: created.user,
        }),

        Err(CreateUserError::Validation(msg)) => ApiResponse::bad_request("VALIDATION_ERROR", &msg),

        Err(CreateUserError::DuplicateKey(field)) => ApiResponse::duplicate_key(&field),

        Err(e) => {
            error!(error = %e, "Failed to create user");
            ApiResponse::internal_error()
        }
    }
}
