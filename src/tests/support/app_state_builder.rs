use std::sync::Arc;

use actix_web::web;

use crate::modules::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::modules::storage::application::domain::Collection;
use crate::modules::storage::application::ports::outgoing::StorageAdapter;
use crate::modules::user::application::domain::entities::Role;
use crate::AppState;

use super::fixtures::{test_hasher, test_tokens, ticket_record, user_record};
use super::memory_store::InMemoryStore;

/// A user already in the store, with a token the built state accepts.
pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Real services over an [`InMemoryStore`], or over any adapter given to
/// [`with_storage`](Self::with_storage).
pub struct TestAppStateBuilder {
    store: Arc<InMemoryStore>,
    storage: Option<Arc<dyn StorageAdapter>>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            storage: None,
            hasher: test_hasher(),
            tokens: test_tokens(),
        }
    }
}

impl TestAppStateBuilder {
    pub fn with_storage(mut self, storage: Arc<dyn StorageAdapter>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn store(&self) -> Arc<InMemoryStore> {
        self.store.clone()
    }

    pub async fn seed_user(&self, username: &str, role: Role) -> SeededUser {
        let id = self
            .store
            .insert(Collection::Users, user_record(username, role))
            .await
            .expect("seed user");
        let email = format!("{username}@example.com");
        let token = self
            .tokens
            .issue_token(&id, Some(&email))
            .expect("issue token");

        SeededUser { id, email, token }
    }

    /// Returns the new ticket's id.
    pub async fn seed_ticket(&self, title: &str, owner: &str) -> String {
        self.store
            .insert(Collection::Tickets, ticket_record(title, owner))
            .await
            .expect("seed ticket")
    }

    pub fn build(self) -> web::Data<AppState> {
        let storage = self
            .storage
            .unwrap_or_else(|| self.store.clone() as Arc<dyn StorageAdapter>);
        web::Data::new(AppState::new(storage, self.hasher, self.tokens))
    }
}
