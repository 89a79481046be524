use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Builders for the JSON responses handlers return.
pub struct ApiResponse;

impl ApiResponse {
    pub fn ok<T: Serialize>(body: T) -> HttpResponse {
        HttpResponse::Ok().json(body)
    }

    pub fn created<T: Serialize>(body: T) -> HttpResponse {
        HttpResponse::Created().json(body)
    }

    pub fn error(status: StatusCode, code: &str, message: &str) -> HttpResponse {
        HttpResponse::build(status).json(ApiError {
            code: code.to_string(),
            message: message.to_string(),
        })
    }

    pub fn not_found(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::NOT_FOUND, code, message)
    }

    pub fn bad_request(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn forbidden(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::FORBIDDEN, code, message)
    }

    pub fn unauthorized(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn conflict(code: &str, message: &str) -> HttpResponse {
        Self::error(StatusCode::CONFLICT, code, message)
    }

    pub fn too_many_requests(message: &str) -> HttpResponse {
        Self::error(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", message)
    }

    pub fn internal_error() -> HttpResponse {
        Self::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An unexpected error occurred",
        )
    }

    /// 409 naming the field that already holds the submitted value.
    pub fn duplicate_key(field: &str) -> HttpResponse {
        Self::conflict("DUPLICATE_KEY", &format!("A record with this {field} already exists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn error_body_carries_code_and_message() {
        let response = ApiResponse::not_found("TICKET_NOT_FOUND", "Ticket not found");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "TICKET_NOT_FOUND");
        assert_eq!(json["message"], "Ticket not found");
    }

    #[actix_web::test]
    async fn internal_error_hides_detail() {
        let response = ApiResponse::internal_error();

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "An unexpected error occurred");
    }
}
