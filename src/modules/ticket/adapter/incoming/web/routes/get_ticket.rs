use actix_web::{get, web, Responder};
use tracing::error;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::ticket::application::ports::incoming::use_cases::GetTicketError;
use crate::shared::api::{ApiError, ApiResponse};
use crate::AppState;

use super::TicketEnvelope;

/// Get a ticket
#[utoipa::path(
    get,
    path = "/api/auth/tickets/{id}",
    tag = "tickets",
    params(("id" = String, Path, description = "Ticket identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The ticket", body = TicketEnvelope),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 403, description = "Not allowed", body = ApiError),
        (status = 404, description = "Ticket not found", body = ApiError)
    )
)]
#[get("/{id}")]
pub async fn get_ticket_handler(
    user: CurrentUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let ticket_id = path.into_inner();

    match data.tickets.get_single.execute(&user, &ticket_id).await {
        Ok(ticket) => ApiResponse::ok(TicketEnvelope::data(ticket)),

        Err(GetTicketError::Forbidden) => {
            ApiResponse::forbidden("FORBIDDEN", "You can only view your own tickets")
        }

        Err(GetTicketError::NotFound) => {
            ApiResponse::not_found("TICKET_NOT_FOUND", "Ticket not found")
        }

        Err(e) => {
            error!(error = %e, ticket_id = %ticket_id, "Failed to fetch ticket");
            ApiResponse::internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::Value;

    use crate::modules::ticket::adapter::incoming::web::routes::{ticket_routes, TICKET_SCOPE};
    use crate::modules::user::application::domain::entities::Role;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;

    #[actix_web::test]
    async fn owner_reads_ticket() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let ticket_id = builder.seed_ticket("Keyboard", &jane.id).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .service(web::scope(TICKET_SCOPE).configure(ticket_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/auth/tickets/{ticket_id}"))
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["ticket_id"], ticket_id.as_str());
        assert_eq!(body["data"]["title"], "Keyboard");
        assert!(body.get("message").is_none());
    }

    #[actix_web::test]
    async fn foreign_ticket_is_forbidden() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let john = builder.seed_user("john", Role::User).await;
        let ticket_id = builder.seed_ticket("VPN", &john.id).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .service(web::scope(TICKET_SCOPE).configure(ticket_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/auth/tickets/{ticket_id}"))
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_ticket_is_404() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .service(web::scope(TICKET_SCOPE).configure(ticket_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/tickets/does-not-exist")
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Ticket not found");
    }
}
