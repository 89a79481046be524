use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct LoginUserCommand {
    pub email: Option<String>,
    pub password: Option<String>,
}

//
// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(String),

    /// Same outcome for an unknown e-mail and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("repository error: {0}")]
    RepositoryError(String),

    #[error("internal error: {0}")]
    Internal(String),
}

//
// ──────────────────────────────────────────────────────────
// Use case trait
// ──────────────────────────────────────────────────────────
//

/// Returns a signed token on success.
#[async_trait]
pub trait LoginUserUseCase: Send + Sync {
    async fn execute(&self, command: LoginUserCommand) -> Result<String, LoginError>;
}
