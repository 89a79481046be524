use std::ops::Deref;

use actix_web::{dev::Payload, web, Error as ActixError, FromRequest, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;
use tracing::error;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::auth::application::ports::incoming::AuthError;
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Extractor that runs the auth gate. Handlers taking a `CurrentUser`
/// only run for requests with a valid token of an existing user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl Deref for CurrentUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn create_api_error(response: HttpResponse) -> ActixError {
    actix_web::error::InternalError::from_response("", response).into()
}

fn rejection(err: &AuthError) -> HttpResponse {
    match err {
        AuthError::MissingToken => ApiResponse::unauthorized("MISSING_TOKEN", &err.to_string()),
        AuthError::TokenExpired => ApiResponse::unauthorized("TOKEN_EXPIRED", &err.to_string()),
        AuthError::InvalidToken => ApiResponse::unauthorized("INVALID_TOKEN", &err.to_string()),
        AuthError::UserNotFound => ApiResponse::unauthorized("INVALID_TOKEN", &err.to_string()),
        AuthError::Storage(_) => ApiResponse::internal_error(),
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let authenticator = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.authenticator.clone(),
            None => {
                error!("AppState is not registered; cannot authenticate request");
                return Box::pin(async { Err(create_api_error(ApiResponse::internal_error())) });
            }
        };
        let token = extract_token_from_header(req);

        Box::pin(async move {
            authenticator
                .execute(token.as_deref())
                .await
                .map(CurrentUser)
                .map_err(|e| create_api_error(rejection(&e)))
        })
    }
}

fn extract_token_from_header(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}
