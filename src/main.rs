pub mod api;
pub mod config;
pub mod health;
pub mod modules;
pub mod shared;

#[cfg(test)]
mod tests;

use std::process;
use std::sync::Arc;

use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;
use crate::config::{load_env_files, AppConfig};
use crate::modules::auth::adapter::outgoing::jwt::JwtTokenService;
use crate::modules::auth::adapter::outgoing::security::BcryptHasher;
use crate::modules::auth::application::ports::incoming::AuthenticateUseCase;
use crate::modules::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::modules::auth::application::services::AuthenticateService;
use crate::modules::storage::adapter::outgoing::backend_selector::connect_storage;
use crate::modules::storage::application::ports::outgoing::StorageAdapter;
use crate::modules::ticket::adapter::incoming::web::routes::{ticket_routes, TICKET_SCOPE};
use crate::modules::ticket::application::service::{
    CreateTicketService, DeleteTicketService, GetTicketService, ListTicketsService,
    UpdateTicketService,
};
use crate::modules::ticket::application::ticket_use_cases::TicketUseCases;
use crate::modules::user::adapter::incoming::web::routes::{user_routes, USER_SCOPE};
use crate::modules::user::application::service::{
    CreateUserService, DeleteUserService, GetUserService, GetUsersService, LoginUserService,
    UpdateUserService,
};
use crate::modules::user::application::user_use_cases::UserUseCases;
use crate::shared::api::{custom_json_config, custom_query_config};
use crate::shared::middleware::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub users: UserUseCases,
    pub tickets: TicketUseCases,
    pub authenticator: Arc<dyn AuthenticateUseCase + Send + Sync>,
}

impl AppState {
    /// Wires every use case onto one storage backend.
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let users = UserUseCases {
            create: Arc::new(CreateUserService::new(
                storage.clone(),
                hasher.clone(),
                tokens.clone(),
            )),
            login: Arc::new(LoginUserService::new(
                storage.clone(),
                hasher.clone(),
                tokens.clone(),
            )),
            get_list: Arc::new(GetUsersService::new(storage.clone())),
            get_single: Arc::new(GetUserService::new(storage.clone())),
            update: Arc::new(UpdateUserService::new(storage.clone(), hasher)),
            delete: Arc::new(DeleteUserService::new(storage.clone())),
        };

        let tickets = TicketUseCases {
            create: Arc::new(CreateTicketService::new(storage.clone())),
            get_list: Arc::new(ListTicketsService::new(storage.clone())),
            get_single: Arc::new(GetTicketService::new(storage.clone())),
            update: Arc::new(UpdateTicketService::new(storage.clone())),
            delete: Arc::new(DeleteTicketService::new(storage.clone())),
        };

        Self {
            users,
            tickets,
            authenticator: Arc::new(AuthenticateService::new(tokens, storage)),
        }
    }
}

/// Both route groups, each behind its own limiter, plus the probes.
pub fn init_routes(
    user_limiter: RateLimiter,
    ticket_limiter: RateLimiter,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(health::health)
            .service(health::readiness)
            .service(
                web::scope(USER_SCOPE)
                    .configure(user_routes)
                    .wrap(user_limiter),
            )
            .service(
                web::scope(TICKET_SCOPE)
                    .configure(ticket_routes)
                    .wrap(ticket_limiter),
            );
    }
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    load_env_files();
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            process::exit(1);
        }
    };

    let storage = match connect_storage(&config.storage).await {
        Ok(storage) => storage,
        Err(e) => {
            error!(error = %e, backend = %config.storage.backend(), "Storage startup failed");
            process::exit(1);
        }
    };

    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(config.bcrypt_cost));
    let tokens: Arc<dyn TokenProvider> = Arc::new(JwtTokenService::new(config.jwt.clone()));
    let state = AppState::new(storage.clone(), hasher, tokens);

    // Built once so every worker shares the same counters.
    let user_limiter = RateLimiter::new(config.user_rate_limit.clone());
    let ticket_limiter = RateLimiter::new(config.ticket_rate_limit.clone());

    let server_url = config.server.bind_address();
    info!(address = %server_url, backend = %storage.backend(), "Server listening");

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(custom_json_config())
            .app_data(custom_query_config())
            .configure(init_routes(user_limiter.clone(), ticket_limiter.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(server_url)?
    .run()
    .await
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
        process::exit(1);
    }
}
