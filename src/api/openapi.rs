use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::schemas::{HealthResponse, MessageResponse, PhoneInput};
use crate::modules::ticket::adapter::incoming::web::routes::{
    CreateTicketRequest, TicketEnvelope, UpdateTicketRequest,
};
use crate::modules::ticket::application::domain::entities::{Ticket, TicketStatus};
use crate::modules::user::adapter::incoming::web::routes::{
    CreateUserRequest, CreateUserResponse, LoginRequest, LoginResponse, UpdateUserRequest,
    UpdateUserResponse,
};
use crate::modules::user::application::domain::entities::{Role, UserView};
use crate::shared::api::{ApiError, Pagination};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Helpdesk API",
        version = "0.1.0",
        description = "Users and support tickets over a pluggable storage backend"
    ),
    paths(
        crate::health::health,
        crate::health::readiness,

        crate::modules::user::adapter::incoming::web::routes::create_user_handler,
        crate::modules::user::adapter::incoming::web::routes::login_user_handler,
        crate::modules::user::adapter::incoming::web::routes::get_users_handler,
        crate::modules::user::adapter::incoming::web::routes::get_user_handler,
        crate::modules::user::adapter::incoming::web::routes::update_user_handler,
        crate::modules::user::adapter::incoming::web::routes::delete_user_handler,

        crate::modules::ticket::adapter::incoming::web::routes::get_tickets_handler,
        crate::modules::ticket::adapter::incoming::web::routes::get_my_tickets_handler,
        crate::modules::ticket::adapter::incoming::web::routes::create_ticket_handler,
        crate::modules::ticket::adapter::incoming::web::routes::get_ticket_handler,
        crate::modules::ticket::adapter::incoming::web::routes::update_ticket_handler,
        crate::modules::ticket::adapter::incoming::web::routes::delete_ticket_handler,
    ),
    components(
        schemas(
            ApiError,
            Pagination,
            MessageResponse,
            HealthResponse,
            PhoneInput,
            Role,
            UserView,
            CreateUserRequest,
            CreateUserResponse,
            LoginRequest,
            LoginResponse,
            UpdateUserRequest,
            UpdateUserResponse,
            Ticket,
            TicketStatus,
            TicketEnvelope,
            CreateTicketRequest,
            UpdateTicketRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login and user management"),
        (name = "tickets", description = "Support tickets"),
        (name = "operations", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by login or registration"))
                        .build(),
                ),
            );
        }
    }
}
