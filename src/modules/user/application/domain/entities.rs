use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::modules::storage::application::domain::collection::{CREATED_AT, LAST_UPDATED};
use crate::modules::storage::application::domain::Record;
use crate::modules::storage::application::ports::outgoing::StorageError;

pub const DEFAULT_DASH_TYPE: &str = "user_dashboard";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

/// A stored user, password digest included. Never serialized; responses
/// use [`UserView`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: i64,
    pub address: Option<String>,
    pub role: Role,
    pub dash_type: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl User {
    pub fn from_record(record: &Record) -> Result<Self, StorageError> {
        let role = record.text("role")?;
        Ok(Self {
            id: record.text("id")?,
            fullname: record.text("fullname")?,
            username: record.text("username")?,
            email: record.text("email")?,
            password_hash: record.text("password")?,
            phone: record.integer("phone")?,
            address: record.optional_text("address")?,
            role: role.parse().map_err(StorageError::InvalidRecord)?,
            dash_type: record.text("dash_type")?,
            created_at: record.timestamp(CREATED_AT)?,
            last_updated: record.optional_timestamp(LAST_UPDATED)?,
        })
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id.clone(),
            fullname: self.fullname.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            phone: self.phone,
            address: self.address.clone(),
            role: self.role,
            dash_type: self.dash_type.clone(),
            created_at: self.created_at,
            last_updated: self.last_updated,
        }
    }
}

/// Public representation of a user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserView {
    pub id: String,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub phone: i64,
    pub address: Option<String>,
    pub role: Role,
    pub dash_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Validated registration data with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: i64,
    pub address: Option<String>,
    pub dash_type: String,
}

impl NewUser {
    /// Every registration starts with the `user` role.
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        Record::new()
            .with("fullname", self.fullname)
            .with("username", self.username)
            .with("email", self.email)
            .with("password", self.password_hash)
            .with("phone", self.phone)
            .with("address", self.address)
            .with("role", Role::User.as_str())
            .with("dash_type", self.dash_type)
            .with(CREATED_AT, now)
            .with(LAST_UPDATED, now)
    }
}

/// Validated partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<i64>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub dash_type: Option<String>,
}

impl UserChanges {
    pub fn into_record(self, now: DateTime<Utc>) -> Record {
        let mut record = Record::new();
        if let Some(v) = self.fullname {
            record.set("fullname", v);
        }
        if let Some(v) = self.username {
            record.set("username", v);
        }
        if let Some(v) = self.email {
            record.set("email", v);
        }
        if let Some(v) = self.password_hash {
            record.set("password", v);
        }
        if let Some(v) = self.phone {
            record.set("phone", v);
        }
        if let Some(v) = self.address {
            record.set("address", v);
        }
        if let Some(v) = self.role {
            record.set("role", v.as_str());
        }
        if let Some(v) = self.dash_type {
            record.set("dash_type", v);
        }
        record.set(LAST_UPDATED, now);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::application::domain::FieldValue;

    fn stored() -> Record {
        let now = Utc::now();
        Record::new()
            .with("id", "u-1")
            .with("fullname", "Jane Doe")
            .with("username", "jane")
            .with("email", "jane@example.com")
            .with("password", "$2b$04$digest")
            .with("phone", 62_811_i64)
            .with("address", FieldValue::Null)
            .with("role", "admin")
            .with("dash_type", DEFAULT_DASH_TYPE)
            .with(CREATED_AT, now)
            .with(LAST_UPDATED, FieldValue::Null)
    }

    #[test]
    fn view_never_serializes_password() {
        let user = User::from_record(&stored()).unwrap();

        let json = serde_json::to_value(user.view()).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["last_updated"], serde_json::Value::Null);
    }

    #[test]
    fn unknown_stored_role_is_invalid() {
        let record = stored().with("role", "superuser");

        let result = User::from_record(&record);

        assert!(matches!(result, Err(StorageError::InvalidRecord(_))));
    }

    #[test]
    fn new_user_record_defaults_role_and_timestamps() {
        let now = Utc::now();
        let record = NewUser {
            fullname: "Jane Doe".to_string(),
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "digest".to_string(),
            phone: 123,
            address: None,
            dash_type: DEFAULT_DASH_TYPE.to_string(),
        }
        .into_record(now);

        assert_eq!(record.text("role").unwrap(), "user");
        assert_eq!(record.get("address"), Some(&FieldValue::Null));
        assert_eq!(record.timestamp(CREATED_AT).unwrap(), now);
        assert!(!record.contains("id"));
    }

    #[test]
    fn changes_only_carry_supplied_fields() {
        let changes = UserChanges {
            fullname: Some("Janet".to_string()),
            ..Default::default()
        };

        let record = changes.into_record(Utc::now());

        assert_eq!(record.len(), 2);
        assert!(record.contains("fullname"));
        assert!(record.contains(LAST_UPDATED));
    }
}
