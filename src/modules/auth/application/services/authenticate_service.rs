use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::auth::application::ports::incoming::{AuthError, AuthenticateUseCase};
use crate::modules::auth::application::ports::outgoing::{TokenError, TokenProvider};
use crate::modules::storage::application::domain::{Collection, Filter};
use crate::modules::storage::application::ports::outgoing::{StorageAdapter, StorageError};
use crate::modules::user::application::domain::entities::User;

pub struct AuthenticateService {
    tokens: Arc<dyn TokenProvider>,
    storage: Arc<dyn StorageAdapter>,
}

impl AuthenticateService {
    pub fn new(tokens: Arc<dyn TokenProvider>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self { tokens, storage }
    }
}

#[async_trait]
impl AuthenticateUseCase for AuthenticateService {
    async fn execute(&self, token: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.tokens.verify_token(token).map_err(|e| match e {
            TokenError::TokenExpired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        let record = self
            .storage
            .find_one(Collection::Users, &Filter::eq("id", claims.id.as_str()))
            .await
            .map_err(|e| match e {
                StorageError::NotFound => {
                    debug!(user_id = %claims.id, "Token subject no longer exists");
                    AuthError::UserNotFound
                }
                other => {
                    error!(error = %other, "Failed to load token subject");
                    AuthError::Storage(other.to_string())
                }
            })?;

        let user = User::from_record(&record).map_err(|e| {
            error!(error = %e, user_id = %claims.id, "Stored user is unreadable");
            AuthError::Storage(e.to_string())
        })?;

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
    use crate::modules::user::application::domain::entities::Role;
    use crate::tests::support::memory_store::InMemoryStore;
    use crate::tests::support::fixtures::user_record;

    fn jwt(expiry_seconds: i64) -> Arc<dyn TokenProvider> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret_key: "authenticate-service-test-secret-32b".to_string(),
            expiry_seconds,
        }))
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let service = AuthenticateService::new(jwt(3600), Arc::new(InMemoryStore::new()));

        assert_eq!(service.execute(None).await, Err(AuthError::MissingToken));
        assert_eq!(service.execute(Some("  ")).await, Err(AuthError::MissingToken));
    }

    #[tokio::test]
    async fn valid_token_loads_user_with_role() {
        let store = Arc::new(InMemoryStore::new());
        let id = store
            .insert(Collection::Users, user_record("admin", Role::Admin))
            .await
            .unwrap();
        let tokens = jwt(3600);
        let token = tokens.issue_token(&id, None).unwrap();
        let service = AuthenticateService::new(tokens, store);

        let user = service.execute(Some(&token)).await.unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.email, "admin@example.com");
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn expired_token_is_distinguished() {
        let tokens = jwt(-10);
        let token = tokens.issue_token("u-1", None).unwrap();
        let service = AuthenticateService::new(tokens, Arc::new(InMemoryStore::new()));

        assert_eq!(service.execute(Some(&token)).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn forged_token_is_rejected_before_lookup() {
        let forged = JwtTokenService::new(JwtConfig {
            secret_key: "attacker-controlled-secret-of-32-b".to_string(),
            expiry_seconds: 3600,
        })
        .issue_token("u-1", None)
        .unwrap();
        let service = AuthenticateService::new(jwt(3600), Arc::new(InMemoryStore::new()));

        assert_eq!(service.execute(Some(&forged)).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_rejected() {
        let tokens = jwt(3600);
        let token = tokens.issue_token("gone", None).unwrap();
        let service = AuthenticateService::new(tokens, Arc::new(InMemoryStore::new()));

        assert_eq!(service.execute(Some(&token)).await, Err(AuthError::UserNotFound));
    }
}
