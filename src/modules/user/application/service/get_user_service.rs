use std::sync::Arc;

use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::user::application::domain::entities::{User, UserView};
use crate::modules::user::application::ports::incoming::use_cases::{GetUserError, GetUserUseCase};

pub struct GetUserService {
    storage: Arc<dyn StorageAdapter>,
}

impl GetUserService {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl GetUserUseCase for GetUserService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        user_id: &str,
    ) -> Result<UserView, GetUserError> {
        if !requester.may_act_on(user_id) {
            return Err(GetUserError::Forbidden);
        }

        let record = self
            .storage
            .find_one(Collection::Users, &Filter::eq("id", user_id))
            .await
            .map_err(|e| match e {
                StorageError::NotFound => GetUserError::NotFound,
                other => GetUserError::RepositoryError(other.to_string()),
            })?;

        User::from_record(&record)
            .map(|u| u.view())
            .map_err(|e| GetUserError::RepositoryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::application::domain::entities::Role;
    use crate::tests::support::fixtures::{requester, user_record};
    use crate::tests::support::memory_store::InMemoryStore;

    #[tokio::test]
    async fn user_reads_own_profile() {
        let store = Arc::new(InMemoryStore::new());
        let id = store
            .insert(Collection::Users, user_record("jane", Role::User))
            .await
            .unwrap();

        let view = GetUserService::new(store)
            .execute(&requester(&id, Role::User), &id)
            .await
            .unwrap();

        assert_eq!(view.username, "jane");
    }

    #[tokio::test]
    async fn user_cannot_read_someone_else() {
        let store = Arc::new(InMemoryStore::new());
        let id = store
            .insert(Collection::Users, user_record("jane", Role::User))
            .await
            .unwrap();

        let result = GetUserService::new(store)
            .execute(&requester("someone-else", Role::User), &id)
            .await;

        assert_eq!(result, Err(GetUserError::Forbidden));
    }

    #[tokio::test]
    async fn admin_gets_not_found_for_missing_user() {
        let result = GetUserService::new(Arc::new(InMemoryStore::new()))
            .execute(&requester("admin-1", Role::Admin), "missing")
            .await;

        assert_eq!(result, Err(GetUserError::NotFound));
    }
}
