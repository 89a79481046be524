use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::Collection;
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::user::application::ports::incoming::use_cases::{
    DeleteUserError, DeleteUserUseCase,
};

pub struct DeleteUserService {
    storage: Arc<dyn StorageAdapter>,
}

impl DeleteUserService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl DeleteUserUseCase for DeleteUserService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        user_id: &str,
    ) -> Result<(), DeleteUserError> {
        if !requester.may_act_on(user_id) {
            return Err(DeleteUserError::Forbidden);
        }

        self.storage
            .delete(Collection::Users, user_id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => DeleteUserError::NotFound,
                other => DeleteUserError::RepositoryError(other.to_string()),
            })?;

        info!(user_id = %user_id, deleted_by = %requester.id, "User deleted");
        Ok(())
    }
}
