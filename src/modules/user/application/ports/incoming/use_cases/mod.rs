pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod get_users;
pub mod login_user;
pub mod update_user;

pub use create_user::{CreateUserCommand, CreateUserError, CreateUserUseCase, CreatedUser};
pub use delete_user::{DeleteUserError, DeleteUserUseCase};
pub use get_user::{GetUserError, GetUserUseCase};
pub use get_users::{GetUsersError, GetUsersUseCase};
pub use login_user::{LoginError, LoginUserCommand, LoginUserUseCase};
pub use update_user::{UpdateUserCommand, UpdateUserError, UpdateUserUseCase};
