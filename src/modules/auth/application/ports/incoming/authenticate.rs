use async_trait::async_trait;

use crate::modules::auth::application::domain::entities::AuthenticatedUser;

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid token or user not found")]
    UserNotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

/// Turns the bearer token of a request into the user it belongs to.
#[async_trait]
pub trait AuthenticateUseCase: Send + Sync {
    async fn execute(&self, token: Option<&str>) -> Result<AuthenticatedUser, AuthError>;
}
