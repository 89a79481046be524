use std::sync::Arc;

use crate::modules::user::application::ports::incoming::use_cases::{
    CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, GetUsersUseCase, LoginUserUseCase,
    UpdateUserUseCase,
};

#[derive(Clone)]
pub struct UserUseCases {
    pub create: Arc<dyn CreateUserUseCase + Send + Sync>,
    pub login: Arc<dyn LoginUserUseCase + Send + Sync>,
    pub get_list: Arc<dyn GetUsersUseCase + Send + Sync>,
    pub get_single: Arc<dyn GetUserUseCase + Send + Sync>,
    pub update: Arc<dyn UpdateUserUseCase + Send + Sync>,
    pub delete: Arc<dyn DeleteUserUseCase + Send + Sync>,
}
