use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::modules::auth::adapter::outgoing::jwt::JwtConfig;
use crate::modules::storage::adapter::outgoing::backend_selector::StorageConfig;
use crate::modules::storage::application::domain::BackendKind;
use crate::shared::middleware::rate_limit::RateLimitConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported database type: {0}")]
    UnsupportedBackend(String),

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
    pub user_rate_limit: RateLimitConfig,
    pub ticket_rate_limit: RateLimitConfig,
}

/// Loads `.env.{RUST_ENV}` when present, otherwise `.env`.
pub fn load_env_files() {
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{}", env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let vars = Vars(vars);

        let server = ServerConfig {
            host: vars.or("HOST", "0.0.0.0"),
            port: vars.parse("PORT", 5001)?,
        };

        let jwt = JwtConfig::new(
            vars.required("JWT_SECRET")?,
            vars.parse("JWT_EXPIRY_SECONDS", 3600)?,
        )?;

        let bcrypt_cost: u32 = vars.parse("BCRYPT_COST", 10)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: "must be between 4 and 31".to_string(),
            });
        }

        Ok(Self {
            server,
            storage: storage_config(&vars)?,
            jwt,
            bcrypt_cost,
            user_rate_limit: rate_limit(
                &vars,
                &USER_RATE_LIMIT,
                100,
                "Too many user requests, please try again later.",
            )?,
            ticket_rate_limit: rate_limit(
                &vars,
                &TICKET_RATE_LIMIT,
                1000,
                "Too many ticket requests, please try again later.",
            )?,
        })
    }
}

fn storage_config(vars: &Vars) -> Result<StorageConfig, ConfigError> {
    let raw = vars.get("DB_TYPE").unwrap_or_default();
    let backend: BackendKind = raw
        .parse()
        .map_err(|_| ConfigError::UnsupportedBackend(raw.to_string()))?;
    let max_connections = vars.parse("DB_MAX_CONNECTIONS", 10)?;

    Ok(match backend {
        BackendKind::MongoDb => StorageConfig::MongoDb {
            uri: vars.or("MONGO_URI", "mongodb://localhost:27017/helpdesk"),
            database: vars.get("MONGO_DB").map(str::to_string),
        },
        BackendKind::MySql => StorageConfig::MySql {
            url: connection_url(
                "mysql",
                &vars.or("MYSQL_USER", "root"),
                &vars.or("MYSQL_PASSWORD", ""),
                &vars.or("MYSQL_HOST", "localhost"),
                vars.parse("MYSQL_PORT", 3306)?,
                &vars.or("MYSQL_DB", "helpdesk"),
            ),
            max_connections,
        },
        BackendKind::Supabase => StorageConfig::Supabase {
            url: connection_url(
                "postgres",
                &vars.required("SUPABASE_USER")?,
                &vars.or("SUPABASE_PASSWORD", ""),
                &vars.required("SUPABASE_HOST")?,
                vars.parse("SUPABASE_PORT", 5432)?,
                &vars.or("SUPABASE_DB", "postgres"),
            ),
            max_connections,
        },
        BackendKind::Firebase => {
            let emulator_host = vars.get("FIRESTORE_EMULATOR_HOST").map(str::to_string);
            let project_id = vars.get("FIREBASE_PROJECT_ID").map(str::to_string);
            if emulator_host.is_some() && project_id.is_none() {
                return Err(ConfigError::Missing("FIREBASE_PROJECT_ID"));
            }
            StorageConfig::Firebase {
                project_id,
                service_account_path: PathBuf::from(
                    vars.or("FIREBASE_SERVICE_ACCOUNT", "config/serviceAccount.json"),
                ),
                emulator_host,
            }
        }
    })
}

struct RateLimitKeys {
    window: &'static str,
    max: &'static str,
    message: &'static str,
}

const USER_RATE_LIMIT: RateLimitKeys = RateLimitKeys {
    window: "USER_RATE_LIMIT_WINDOW_SECS",
    max: "USER_RATE_LIMIT_MAX",
    message: "USER_RATE_LIMIT_MESSAGE",
};

const TICKET_RATE_LIMIT: RateLimitKeys = RateLimitKeys {
    window: "TICKET_RATE_LIMIT_WINDOW_SECS",
    max: "TICKET_RATE_LIMIT_MAX",
    message: "TICKET_RATE_LIMIT_MESSAGE",
};

fn rate_limit(
    vars: &Vars,
    keys: &RateLimitKeys,
    default_max: u32,
    default_message: &str,
) -> Result<RateLimitConfig, ConfigError> {
    let window_secs: u64 = vars.parse(keys.window, 60)?;
    let max_requests: u32 = vars.parse(keys.max, default_max)?;
    if window_secs == 0 || max_requests == 0 {
        return Err(ConfigError::Invalid {
            key: if window_secs == 0 { keys.window } else { keys.max },
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(RateLimitConfig {
        window: Duration::from_secs(window_secs),
        max_requests,
        message: vars.or(keys.message, default_message),
    })
}

/// Percent-encodes userinfo so passwords with `@` or `:` survive the URL.
fn connection_url(
    scheme: &str,
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    database: &str,
) -> String {
    let user = urlencoding::encode(user);
    let credentials = if password.is_empty() {
        user.into_owned()
    } else {
        format!("{user}:{}", urlencoding::encode(password))
    };
    format!("{scheme}://{credentials}@{host}:{port}/{database}")
}

struct Vars(HashMap<String, String>);

impl Vars {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key)
            .map(str::to_string)
            .ok_or(ConfigError::Missing(key))
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }),
        }
    }
}
