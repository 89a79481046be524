use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web::{JsonConfig, QueryConfig};
use tracing::debug;

use crate::shared::api::ApiResponse;

pub fn custom_json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "Rejected request body");
        let message = json_error_message(&err);
        actix_web::error::InternalError::from_response(
            err,
            ApiResponse::bad_request("VALIDATION_ERROR", message),
        )
        .into()
    })
}

pub fn custom_query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "Rejected query string");
        let message = match &err {
            QueryPayloadError::Deserialize(_) => "Invalid query parameters",
            _ => "Invalid query string",
        };
        actix_web::error::InternalError::from_response(
            err,
            ApiResponse::bad_request("VALIDATION_ERROR", message),
        )
        .into()
    })
}

/// Client-facing text for a rejected body; parser detail stays in the logs.
fn json_error_message(err: &JsonPayloadError) -> &'static str {
    match err {
        JsonPayloadError::ContentType => "Content type must be application/json",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large"
        }
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            "Request body does not match the expected fields"
        }
        JsonPayloadError::Deserialize(_) => "Request body is not valid JSON",
        _ => "Invalid request body",
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use serde::Deserialize;
    use serde_json::Value;

    use super::*;

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    #[allow(dead_code)]
    struct Body {
        name: String,
    }

    async fn accept(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn unknown_fields_are_rejected_without_parser_detail() {
        let app = test::init_service(
            App::new()
                .app_data(custom_json_config())
                .route("/", web::post().to(accept)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"name":"a","createdBy":"x"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Request body does not match the expected fields");
    }

    #[actix_web::test]
    async fn malformed_json_is_a_validation_error() {
        let app = test::init_service(
            App::new()
                .app_data(custom_json_config())
                .route("/", web::post().to(accept)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\":")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Request body is not valid JSON");
    }
}
