use std::fmt;

use crate::config::ConfigError;

const MIN_SECRET_BYTES: usize = 32;
const MAX_EXPIRY_SECONDS: i64 = 86_400;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    /// Lifetime of issued tokens, in seconds
    pub expiry_seconds: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret_key", &"<redacted>")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret_key: String, expiry_seconds: i64) -> Result<Self, ConfigError> {
        // HS256 needs at least 32 bytes of key material
        if secret_key.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {MIN_SECRET_BYTES} bytes long"),
            });
        }

        if expiry_seconds <= 0 || expiry_seconds > MAX_EXPIRY_SECONDS {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRY_SECONDS",
                reason: format!("must be between 1 and {MAX_EXPIRY_SECONDS} seconds"),
            });
        }

        Ok(Self {
            secret_key,
            expiry_seconds,
        })
    }
}
