use crate::modules::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::modules::auth::application::ports::outgoing::TokenProvider;

use super::fixtures::TEST_JWT_SECRET;

fn token_with(secret: &str, expiry_seconds: i64, user_id: &str) -> String {
    JwtTokenService::new(JwtConfig {
        secret_key: secret.to_string(),
        expiry_seconds,
    })
    .issue_token(user_id, None)
    .unwrap()
}

/// Signed with the test secret, valid for an hour.
pub fn token_for(user_id: &str) -> String {
    token_with(TEST_JWT_SECRET, 3600, user_id)
}

/// Correctly signed but already past `exp`.
pub fn expired_token(user_id: &str) -> String {
    token_with(TEST_JWT_SECRET, -60, user_id)
}

/// Well-formed and unexpired, signed with a different secret.
pub fn forged_token(user_id: &str) -> String {
    token_with("not-the-server-secret-but-32-bytes-long", 3600, user_id)
}
