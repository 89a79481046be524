use actix_web::{post, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::modules::user::application::ports::incoming::use_cases::{LoginError, LoginUserCommand};
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

/// Login request from client
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(example = "s3cret-pass")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    /// Bearer token valid for one hour by default
    pub token: String,
}

/// User login
///
/// Exchanges email and password for a signed token.
#[utoipa::path(
    post,
    path = "/api/auth/user/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 429, description = "Rate limited", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[post("/login")]
pub async fn login_user_handler(
    req: web::Json<LoginRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let req = req.into_inner();
    let command = LoginUserCommand {
        email: req.email,
        password: req.password,
    };

    match data.users.login.execute(command).await {
        Ok(token) => ApiResponse::ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
        }),

        Err(LoginError::Validation(msg)) => ApiResponse::bad_request("VALIDATION_ERROR", &msg),

        Err(LoginError::InvalidCredentials) => {
            ApiResponse::unauthorized("INVALID_CREDENTIALS", "Invalid credentials")
        }

        Err(e) => {
            error!(error = %e, "Login failed");
            ApiResponse::internal_error()
        }
    }
}
