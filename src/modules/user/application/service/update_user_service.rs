use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::auth::application::ports::outgoing::PasswordHasher;
use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::user::application::domain::entities::{User, UserChanges, UserView};
use crate::modules::user::application::ports::incoming::use_cases::{
    UpdateUserCommand, UpdateUserError, UpdateUserUseCase,
};
use crate::shared::validation::{normalize_email, parse_phone, required_text};

pub struct UpdateUserService {
    storage: Arc<dyn StorageAdapter>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UpdateUserService {
    pub fn new(storage: Arc<dyn StorageAdapter>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { storage, hasher }
    }
}

fn text(field: &str, value: Option<String>) -> Result<Option<String>, UpdateUserError> {
    value
        .map(|v| required_text(field, &v))
        .transpose()
        .map_err(UpdateUserError::Validation)
}

#[async_trait]
impl UpdateUserUseCase for UpdateUserService {
    async fn execute(
        &self,
        requester: &AuthenticatedUser,
        user_id: &str,
        command: UpdateUserCommand,
    ) -> Result<UserView, UpdateUserError> {
        if !requester.may_act_on(user_id) {
            return Err(UpdateUserError::Forbidden(
                "not allowed to update this user".to_string(),
            ));
        }
        if command.role.is_some() && !requester.is_admin() {
            return Err(UpdateUserError::Forbidden(
                "only admins may change roles".to_string(),
            ));
        }

        let password = match command.password {
            Some(p) if p.trim().is_empty() => {
                return Err(UpdateUserError::Validation("password is required".to_string()))
            }
            other => other,
        };

        let mut changes = UserChanges {
            fullname: text("fullname", command.fullname)?,
            username: text("username", command.username)?,
            email: command
                .email
                .map(|e| normalize_email(&e))
                .transpose()
                .map_err(UpdateUserError::Validation)?,
            password_hash: None,
            phone: command
                .phone
                .map(|p| parse_phone(&p))
                .transpose()
                .map_err(UpdateUserError::Validation)?,
            address: text("address", command.address)?,
            role: command.role,
            dash_type: text("dash_type", command.dash_type)?,
        };
        if changes == UserChanges::default() && password.is_none() {
            return Err(UpdateUserError::Validation(
                "at least one field must be provided".to_string(),
            ));
        }

        if let Some(password) = password {
            changes.password_hash = Some(
                self.hasher
                    .hash_password(&password)
                    .await
                    .map_err(|e| UpdateUserError::Internal(e.to_string()))?,
            );
        }

        self.storage
            .update(Collection::Users, user_id, changes.into_record(Utc::now()))
            .await
            .map_err(|e| match e {
                StorageError::NotFound => UpdateUserError::NotFound,
                StorageError::DuplicateKey { field } => UpdateUserError::DuplicateKey(field),
                other => UpdateUserError::RepositoryError(other.to_string()),
            })?;

        let record = self
            .storage
            .find_one(Collection::Users, &Filter::eq("id", user_id))
            .await
            .map_err(|e| match e {
                StorageError::NotFound => UpdateUserError::NotFound,
                other => UpdateUserError::RepositoryError(other.to_string()),
            })?;

        info!(user_id = %user_id, updated_by = %requester.id, "User updated");
        User::from_record(&record)
            .map(|u| u.view())
            .map_err(|e| UpdateUserError::RepositoryError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::application::domain::entities::Role;
    use crate::tests::support::fixtures::{requester, test_hasher, user_record};
    use crate::tests::support::memory_store::InMemoryStore;

    async fn seeded() -> (Arc<InMemoryStore>, String, String) {
        let store = Arc::new(InMemoryStore::new());
        let jane = store
            .insert(Collection::Users, user_record("jane", Role::User))
            .await
            .unwrap();
        let john = store
            .insert(Collection::Users, user_record("john", Role::User))
            .await
            .unwrap();
        (store, jane, john)
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (store, jane, _) = seeded().await;
        let service = UpdateUserService::new(store, test_hasher());

        let view = service
            .execute(
                &requester(&jane, Role::User),
                &jane,
                UpdateUserCommand {
                    fullname: Some("Jane Q. Doe".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.fullname, "Jane Q. Doe");
        assert_eq!(view.username, "jane");
        assert_eq!(view.email, "jane@example.com");
        assert!(view.last_updated.is_some());
    }

    #[tokio::test]
    async fn new_password_is_hashed() {
        let (store, jane, _) = seeded().await;
        let service = UpdateUserService::new(store.clone(), test_hasher());

        service
            .execute(
                &requester(&jane, Role::User),
                &jane,
                UpdateUserCommand {
                    password: Some("n3w-pass".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let record = store
            .find_one(Collection::Users, &Filter::eq("id", jane.as_str()))
            .await
            .unwrap();
        let digest = record.text("password").unwrap();
        assert!(test_hasher().verify_password("n3w-pass", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn users_cannot_promote_themselves() {
        let (store, jane, _) = seeded().await;
        let service = UpdateUserService::new(store, test_hasher());

        let result = service
            .execute(
                &requester(&jane, Role::User),
                &jane,
                UpdateUserCommand {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UpdateUserError::Forbidden(_))));
    }

    #[tokio::test]
    async fn admin_may_change_role() {
        let (store, jane, _) = seeded().await;
        let service = UpdateUserService::new(store, test_hasher());

        let view = service
            .execute(
                &requester("admin-1", Role::Admin),
                &jane,
                UpdateUserCommand {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.role, Role::Admin);
    }

    #[tokio::test]
    async fn taking_another_users_email_is_a_duplicate() {
        let (store, jane, _) = seeded().await;
        let service = UpdateUserService::new(store, test_hasher());

        let result = service
            .execute(
                &requester(&jane, Role::User),
                &jane,
                UpdateUserCommand {
                    email: Some("john@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(result, Err(UpdateUserError::DuplicateKey("email".to_string())));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let (store, jane, _) = seeded().await;
        let service = UpdateUserService::new(store, test_hasher());

        let result = service
            .execute(&requester(&jane, Role::User), &jane, UpdateUserCommand::default())
            .await;

        assert!(matches!(result, Err(UpdateUserError::Validation(_))));
    }

    #[tokio::test]
    async fn admin_updating_missing_user_gets_not_found() {
        let (store, _, _) = seeded().await;
        let service = UpdateUserService::new(store, test_hasher());

        let result = service
            .execute(
                &requester("admin-1", Role::Admin),
                "missing",
                UpdateUserCommand {
                    fullname: Some("Nobody".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(result, Err(UpdateUserError::NotFound));
    }
}
