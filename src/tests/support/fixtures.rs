use std::sync::Arc;

use chrono::Utc;

use crate::modules::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::modules::auth::adapter::outgoing::security::BcryptHasher;
use crate::modules::auth::application::domain::entities::AuthenticatedUser;
use crate::modules::auth::application::ports::outgoing::{PasswordHasher, TokenProvider};
use crate::modules::storage::application::domain::Record;
use crate::modules::ticket::application::domain::entities::{NewTicket, TicketStatus};
use crate::modules::user::application::domain::entities::{NewUser, Role, DEFAULT_DASH_TYPE};
use crate::modules::user::application::ports::incoming::use_cases::CreateUserCommand;

pub const TEST_PASSWORD: &str = "s3cret-pass";
pub const TEST_JWT_SECRET: &str = "helpdesk-test-secret-at-least-32-bytes";

/// Lowest cost bcrypt accepts, to keep tests fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_hasher() -> Arc<dyn PasswordHasher> {
    Arc::new(BcryptHasher::new(TEST_BCRYPT_COST))
}

pub fn test_tokens() -> Arc<dyn TokenProvider> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret_key: TEST_JWT_SECRET.to_string(),
        expiry_seconds: 3600,
    }))
}

pub fn create_user_command(username: &str) -> CreateUserCommand {
    CreateUserCommand {
        fullname: format!("{username} Tester"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: TEST_PASSWORD.to_string(),
        phone: "123".to_string(),
        address: None,
        dash_type: None,
    }
}

/// Stored user whose password is [`TEST_PASSWORD`].
pub fn user_record(username: &str, role: Role) -> Record {
    let digest = bcrypt::hash(TEST_PASSWORD, TEST_BCRYPT_COST).unwrap();
    let mut record = NewUser {
        fullname: format!("{username} Tester"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: digest,
        phone: 123,
        address: None,
        dash_type: DEFAULT_DASH_TYPE.to_string(),
    }
    .into_record(Utc::now());
    record.set("role", role.as_str());
    record
}

/// Open ticket described as `"{title}: details"`.
pub fn ticket_record(title: &str, owner: &str) -> Record {
    NewTicket {
        title: title.to_string(),
        description: format!("{title}: details"),
        status: TicketStatus::Open,
        created_by: owner.to_string(),
    }
    .into_record(Utc::now())
}

pub fn requester(id: &str, role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        role,
    }
}
