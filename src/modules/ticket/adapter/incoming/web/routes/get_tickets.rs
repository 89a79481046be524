use actix_web::{get, web, Responder};
use tracing::error;

use crate::modules::auth::adapter::incoming::web::extractors::CurrentUser;
use crate::modules::ticket::application::domain::entities::Ticket;
use crate::shared::api::{ApiError, ApiResponse, PageQuery, PaginatedResponse};
use crate::AppState;

/// List tickets
///
/// Admins receive every ticket; everyone else only their own.
#[utoipa::path(
    get,
    path = "/api/auth/tickets",
    tag = "tickets",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A page of tickets", body = PaginatedResponse<Ticket>),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[get("")]
pub async fn get_tickets_handler(
    user: CurrentUser,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data
        .tickets
        .get_list
        .execute(&user, None, query.to_request())
        .await
    {
        Ok(page) => ApiResponse::ok(PaginatedResponse::from(page)),
        Err(e) => {
            error!(error = %e, requester = %user.id, "Failed to list tickets");
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
    async fn user_sees_only_own_tickets_admin_sees_all() {
        let builder = TestAppStateBuilder::default();
        let jane = builder.seed_user("jane", Role::User).await;
        let john = builder.seed_user("john", Role::User).await;
        let root = builder.seed_user("root", Role::Admin).await;
        builder.seed_ticket("Jane's laptop", &jane.id).await;
        builder.seed_ticket("John's VPN", &john.id).await;
        let app = test::init_service(
            App::new()
                .app_data(builder.build())
                .service(web::scope(TICKET_SCOPE).configure(ticket_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(TICKET_SCOPE)
            .insert_header(("Authorization", format!("Bearer {}", jane.token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["createdBy"], jane.id.as_str());
        assert_eq!(body["pagination"]["totalCount"], 1);

        let req = test::TestRequest::get()
            .uri(TICKET_SCOPE)
            .insert_header(("Authorization", format!("Bearer {}", root.token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["totalCount"], 2);
    }

    #[actix_web::test]
    async fn listing_requires_token() {
        let app = test::init_service(
            App::new()
                .app_data(TestAppStateBuilder::default().build())
                .service(web::scope(TICKET_SCOPE).configure(ticket_routes)),
        )
        .await;

        let req = test::TestRequest::get().uri(TICKET_SCOPE).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No token provided");
    }
}
