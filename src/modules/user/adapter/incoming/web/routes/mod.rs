mod create_user;
mod delete_user;
mod get_user;
mod get_users;
mod login_user;
mod update_user;

use actix_web::web;

pub use create_user::*;
pub use delete_user::*;
pub use get_user::*;
pub use get_users::*;
pub use login_user::*;
pub use update_user::*;

pub const USER_SCOPE: &str = "/api/auth/user";

/// Registers the user handlers, relative to [`USER_SCOPE`]. `/login` is
/// registered ahead of `/{id}`.
pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_user_handler)
        .service(create_user_handler)
        .service(get_users_handler)
        .service(get_user_handler)
        .service(update_user_handler)
        .service(delete_user_handler);
}
