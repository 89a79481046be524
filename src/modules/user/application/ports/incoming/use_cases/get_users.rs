use async_trait::async_trait;

use crate::modules::storage::application::domain::{Page, PageRequest};
use crate::modules::user::application::domain::entities::UserView;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GetUsersError {
    #[error("repository error: {0}")]
    RepositoryError(String),
}

#[async_trait]
pub trait GetUsersUseCase: Send + Sync {
    async fn execute(&self, page: PageRequest) -> Result<Page<UserView>, GetUsersError>;
}
