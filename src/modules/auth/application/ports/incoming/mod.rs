pub mod authenticate;

pub use authenticate::{AuthError, AuthenticateUseCase};
