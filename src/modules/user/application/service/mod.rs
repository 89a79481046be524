pub mod create_user_service;
pub mod delete_user_service;
pub mod get_user_service;
pub mod get_users_service;
pub mod login_user_service;
pub mod update_user_service;

pub use create_user_service::CreateUserService;
pub use delete_user_service::DeleteUserService;
pub use get_user_service::GetUserService;
pub use get_users_service::GetUsersService;
pub use login_user_service::LoginUserService;
pub use update_user_service::UpdateUserService;
