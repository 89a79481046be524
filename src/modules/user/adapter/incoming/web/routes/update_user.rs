use actix_web::{put, web, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::api::schemas::PhoneInput;
use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::user::application::domain::entities::{Role, UserView};
use crate::modules::user::application::ports::incoming::use_cases::{
    UpdateUserCommand, UpdateUserError,
};
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

/// Fields a client may change. Anything else (`id`, `createdAt`, ...) is
/// rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<PhoneInput>,
    pub address: Option<String>,
    /// Admins only
    pub role: Option<Role>,
    pub dash_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateUserResponse {
    #[schema(example = "User updated successfully")]
    pub message: String,
    pub user: UserView,
}

/// Update a user
///
/// Partial update; only supplied fields change.
#[utoipa::path(
    put,
    path = "/api/auth/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponse),
        (status = 400, description = "Invalid input", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
        (status = 409, description = "Username or email already taken", body = ApiError)
    )
)]
#[put("/{id}")]
pub async fn update_user_handler(
    user: CurrentUser,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let user_id = path.into_inner();
    let req = req.into_inner();
    let command = UpdateUserCommand {
        fullname: req.fullname,
        username: req.username,
        email: req.email,
        password: req.password,
        phone: req.phone.map(PhoneInput::into_raw),
        address: req.address,
        role: req.role,
        dash_type: req.dash_type,
    };

    match data.users.update.execute(&user, &user_id, command).await {
        Ok(view) => ApiResponse::ok(UpdateUserResponse {
            message: "User updated successfully".to_string(),
            user: view,
        }),

        Err(UpdateUserError::Validation(msg)) => ApiResponse::bad_request("VALIDATION_ERROR", &msg),

        Err(UpdateUserError::Forbidden(msg)) => ApiResponse::forbidden("FORBIDDEN", &msg),

        Err(UpdateUserError::NotFound) => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),

        Err(UpdateUserError::DuplicateKey(field)) => ApiResponse::duplicate_key(&field),

        Err(e) => {
            error!(error = %e, user_id = %user_id, "Failed to update user");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};

    use crate::modules::user::adapter::incoming::web::routes::{user_routes, USER_SCOPE};
    use crate::modules::user::application::domain::entities::Role;
    use crate::shared::api::custom_json_config;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;

    #[actix_web::test]
    async fn updates_own_profile() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .app_data(custom_json_config())
                .service(web::scope(USER_SCOPE).configure(user_routes)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/auth/user/{}", jane.id))
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .set_json(json!({ "address": "12 Harbour Road", "phone": "5550101" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["address"], "12 Harbour Road");
        assert_eq!(body["user"]["phone"], 5_550_101);
        assert_eq!(body["user"]["username"], "jane");
    }

    #[actix_web::test]
    async fn unknown_fields_are_rejected() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .app_data(custom_json_config())
                .service(web::scope(USER_SCOPE).configure(user_routes)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/auth/user/{}", jane.id))
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .set_json(json!({ "createdAt": "2020-01-01T00:00:00Z" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn role_change_needs_admin() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .app_data(custom_json_config())
                .service(web::scope(USER_SCOPE).configure(user_routes)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/auth/user/{}", jane.id))
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .set_json(json!({ "role": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
